use crate::domain::SampleType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Access {
    Share,
    Read,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Share => "share",
            Access::Read => "read",
        }
    }

    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "share" => Some(Access::Share),
            "read" => Some(Access::Read),
            _ => None,
        }
    }
}

/// Asked the first time a store sees a (sample type, access) pair.
///
/// `None` leaves the pair undecided: it counts as not granted and is asked
/// again on the next request.
pub trait ConsentPrompt: Send + Sync {
    fn ask(&self, sample_type: SampleType, access: Access) -> Option<bool>;
}
