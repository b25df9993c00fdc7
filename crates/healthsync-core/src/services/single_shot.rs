//! Asynchronous channel that delivers at most one value and exactly one
//! terminal signal.
//!
//! The producer side ([`Completer`]) is consumed by whichever completion it
//! reports, so a second emission cannot be expressed. Dropping it without
//! reporting finishes the stream with no value and no error.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future;
use futures::stream::{self, BoxStream, Fuse, FusedStream};
use futures::{Stream, StreamExt};
use tokio::sync::oneshot;

pub fn channel<T, E>() -> (Completer<T, E>, SingleShot<T, E>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let inner = stream::once(receiver)
        .filter_map(|delivered| future::ready(delivered.ok()))
        .boxed()
        .fuse();
    (Completer { sender }, SingleShot { inner })
}

pub struct Completer<T, E> {
    sender: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Completer<T, E> {
    /// Returns `false` when the consumer is already gone; the value is dropped.
    pub fn succeed(self, value: T) -> bool {
        self.sender.send(Ok(value)).is_ok()
    }

    pub fn fail(self, error: E) -> bool {
        self.sender.send(Err(error)).is_ok()
    }

    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }
}

pub struct SingleShot<T, E> {
    inner: Fuse<BoxStream<'static, Result<T, E>>>,
}

impl<T, E> SingleShot<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn empty() -> Self {
        Self {
            inner: stream::empty().boxed().fuse(),
        }
    }

    pub async fn recv(mut self) -> Option<Result<T, E>> {
        self.inner.next().await
    }
}

impl<T, E> Stream for SingleShot<T, E> {
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl<T, E> FusedStream for SingleShot<T, E> {
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}
