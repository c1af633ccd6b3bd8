use failure::Fail;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Error is every fatal condition a transformation can hit. Data problems such as missing fields or
/// failed coercions never show up here, they become `null` in the output instead.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "malformed expression in \"{}\": {}", location, message)]
    MalformedExpression { message: String, location: String },

    #[fail(display = "cannot find operation `{}` in \"{}\"", name, location)]
    UnknownOperation { name: String, location: String },

    #[fail(display = "cannot find function `{}` in \"{}\"", name, location)]
    UnknownFunction { name: String, location: String },

    #[fail(
        display = "invalid arguments for `{}` in \"{}\": {}",
        operation, location, message
    )]
    InvalidArguments {
        operation: String,
        location: String,
        message: String,
    },

    #[fail(display = "invalid namespace: {}", _0)]
    InvalidNamespace(String),

    #[fail(display = "failed to read {} in \"{}\": {}", path, location, source)]
    Io {
        path: String,
        location: String,
        #[cause]
        source: io::Error,
    },

    /// `location` stays empty for the input document and the template themselves.
    #[fail(display = "invalid JSON in \"{}\": {}", location, source)]
    Json {
        location: String,
        #[cause]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn malformed<M, L>(message: M, location: L) -> Self
    where
        M: Into<String>,
        L: Into<String>,
    {
        Error::MalformedExpression {
            message: message.into(),
            location: location.into(),
        }
    }

    /// an argument error raised from inside an operation, the resolver fills in which operation
    /// and where.
    pub fn invalid_arguments<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Error::InvalidArguments {
            operation: String::new(),
            location: String::new(),
            message: message.into(),
        }
    }

    /// attaches the location breadcrumb to errors raised without one.
    pub(crate) fn at(mut self, at: &str) -> Self {
        match &mut self {
            Error::MalformedExpression { location, .. }
            | Error::UnknownOperation { location, .. }
            | Error::UnknownFunction { location, .. }
            | Error::InvalidArguments { location, .. }
            | Error::Io { location, .. }
            | Error::Json { location, .. } => {
                if location.is_empty() {
                    *location = at.to_owned();
                }
            }
            _ => {}
        };
        self
    }

    /// attaches both the operation name and the location to argument errors.
    pub(crate) fn within(mut self, name: &str, at: &str) -> Self {
        if let Error::InvalidArguments { operation, .. } = &mut self {
            if operation.is_empty() {
                *operation = name.to_owned();
            }
        }
        self.at(at)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            location: String::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_is_attached_once() {
        let err = Error::malformed("bad", "").at(".outer").at(".inner");
        assert_eq!(
            "malformed expression in \".outer\": bad",
            err.to_string()
        );
    }

    #[test]
    fn test_io_and_json_are_located() {
        let err = Error::Io {
            path: String::from("/tmp/enum.json"),
            location: String::new(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .within("enumFileChange", ".field");
        assert_eq!(
            "failed to read /tmp/enum.json in \".field\": gone",
            err.to_string()
        );

        let err = Error::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
            .at(".rows.0");
        match err {
            Error::Json { location, .. } => assert_eq!(".rows.0", location),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_within() {
        let err = Error::invalid_arguments("expected 1 argument(s), received 2").within("+", ".sum");
        assert_eq!(
            "invalid arguments for `+` in \".sum\": expected 1 argument(s), received 2",
            err.to_string()
        );
    }
}
