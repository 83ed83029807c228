use std::fmt::{Debug, Display, Formatter};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    Message(String),
    /// The working memory of an operation cannot be represented on this platform
    SizeOverflow,
    /// No conversion exists for this integer format
    UnsupportedIntegerFormat { width: usize, is_signed: bool },
    /// The destination buffer cannot hold the result
    BufferTooSmall { required: usize, available: usize },
    /// A byte buffer could not be encoded or decoded
    Serialization(String),
    /// The operating system entropy source could not be read
    EntropySource(String),
    /// A set of parameters is inconsistent
    InvalidParameters(String),
}

#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(message: String) -> Self {
        Self::from(ErrorKind::Message(message))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            ErrorKind::Message(msg) => write!(f, "{msg}"),
            ErrorKind::SizeOverflow => {
                write!(f, "The required working memory overflows the address space")
            }
            ErrorKind::UnsupportedIntegerFormat { width, is_signed } => {
                let sign = if *is_signed { "signed" } else { "unsigned" };
                write!(f, "no support for {width}bits {sign} integer")
            }
            ErrorKind::BufferTooSmall {
                required,
                available,
            } => write!(
                f,
                "Buffer too small: {required} elements required, {available} available"
            ),
            ErrorKind::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            ErrorKind::EntropySource(msg) => write!(f, "Entropy source failure: {msg}"),
            ErrorKind::InvalidParameters(msg) => write!(f, "Invalid parameters: {msg}"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

impl<'a> From<&'a str> for Error {
    fn from(message: &'a str) -> Self {
        Self::new(message.to_string())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<dyn_stack::SizeOverflow> for Error {
    fn from(_value: dyn_stack::SizeOverflow) -> Self {
        Self::from(ErrorKind::SizeOverflow)
    }
}

impl From<bincode::Error> for Error {
    fn from(value: bincode::Error) -> Self {
        Self::from(ErrorKind::Serialization(value.to_string()))
    }
}

impl From<concrete_csprng::seeders::SeederError> for Error {
    fn from(value: concrete_csprng::seeders::SeederError) -> Self {
        Self::from(ErrorKind::EntropySource(value.0))
    }
}

impl std::error::Error for Error {}
