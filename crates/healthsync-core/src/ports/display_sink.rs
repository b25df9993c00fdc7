pub trait DisplaySink: Send + Sync {
    fn show(&self, text: &str);
}
