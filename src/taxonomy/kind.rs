//! # Failure classification.
//!
//! [`Kind`] says *what* went wrong. It is pure data: everything derived from it
//! (a short description, the gRPC code, the HTTP status) comes from total
//! mappings defined here, so protocol adapters can translate a classified
//! [`Error`](crate::Error) into a wire status without inspecting the error itself.
//!
//! | Kind         | Description        | gRPC               | HTTP |
//! |--------------|--------------------|--------------------|------|
//! | `Unknown`    | `unknown error`    | `Unknown`          | 500  |
//! | `Invalid`    | `invalid error`    | `InvalidArgument`  | 400  |
//! | `Permission` | `permission error` | `PermissionDenied` | 401  |
//! | `Exist`      | `exist error`      | `AlreadyExists`    | 409  |
//! | `NotExist`   | `not exist error`  | `NotFound`         | 404  |
//! | `Internal`   | `internal error`   | `Internal`         | 500  |
//!
//! Raw values outside the enumeration (e.g. decoded from a foreign source) go
//! through [`Classification::of_raw`] and land on the unknown/internal status.

use std::fmt;

use http::StatusCode;
use tonic::Code;

/// Semantic classification of a failure.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    /// Unclassified failure.
    #[default]
    Unknown = 0,
    /// Caller supplied something malformed.
    Invalid = 1,
    /// Caller is not allowed to do this.
    Permission = 2,
    /// The target already exists.
    Exist = 3,
    /// The target does not exist.
    NotExist = 4,
    /// Something broke on our side.
    Internal = 5,
}

impl Kind {
    /// All kinds, in discriminant order.
    pub const ALL: [Kind; 6] = [
        Kind::Unknown,
        Kind::Invalid,
        Kind::Permission,
        Kind::Exist,
        Kind::NotExist,
        Kind::Internal,
    ];

    /// Decodes a raw discriminant; `None` for values outside the enumeration.
    pub fn from_raw(raw: u8) -> Option<Kind> {
        Kind::ALL.get(usize::from(raw)).copied()
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Kind::Unknown => "unknown error",
            Kind::Invalid => "invalid error",
            Kind::Permission => "permission error",
            Kind::Exist => "exist error",
            Kind::NotExist => "not exist error",
            Kind::Internal => "internal error",
        }
    }

    /// gRPC status code for this kind.
    pub fn grpc_code(self) -> Code {
        match self {
            Kind::Unknown => Code::Unknown,
            Kind::Invalid => Code::InvalidArgument,
            Kind::Permission => Code::PermissionDenied,
            Kind::Exist => Code::AlreadyExists,
            Kind::NotExist => Code::NotFound,
            Kind::Internal => Code::Internal,
        }
    }

    /// HTTP status code for this kind.
    pub fn http_status(self) -> StatusCode {
        match self {
            Kind::Unknown | Kind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Kind::Invalid => StatusCode::BAD_REQUEST,
            Kind::Permission => StatusCode::UNAUTHORIZED,
            Kind::Exist => StatusCode::CONFLICT,
            Kind::NotExist => StatusCode::NOT_FOUND,
        }
    }

    /// Bundles description and both protocol statuses.
    pub fn classify(self) -> Classification {
        Classification {
            description: self.description(),
            grpc: self.grpc_code(),
            http: self.http_status(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use runkit::Kind;
    ///
    /// assert_eq!(Kind::NotExist.as_label(), "not_exist");
    /// ```
    pub fn as_label(self) -> &'static str {
        match self {
            Kind::Unknown => "unknown",
            Kind::Invalid => "invalid",
            Kind::Permission => "permission",
            Kind::Exist => "exist",
            Kind::NotExist => "not_exist",
            Kind::Internal => "internal",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Description plus wire statuses derived from a [`Kind`].
///
/// # Example
/// ```
/// use runkit::{Classification, Kind};
///
/// let c = Kind::Exist.classify();
/// assert_eq!(c.grpc, tonic::Code::AlreadyExists);
/// assert_eq!(c.http, http::StatusCode::CONFLICT);
///
/// let foreign = Classification::of_raw(42);
/// assert_eq!(foreign.grpc, tonic::Code::Unknown);
/// assert_eq!(foreign.http, http::StatusCode::INTERNAL_SERVER_ERROR);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Short human-readable description.
    pub description: &'static str,
    /// RPC-style status.
    pub grpc: Code,
    /// HTTP-style status.
    pub http: StatusCode,
}

impl Classification {
    /// Classifies a raw discriminant. Never panics.
    pub fn of_raw(raw: u8) -> Classification {
        match Kind::from_raw(raw) {
            Some(kind) => kind.classify(),
            None => Classification {
                description: "unknown error kind",
                grpc: Code::Unknown,
                http: StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<Kind> for Classification {
    fn from(kind: Kind) -> Self {
        kind.classify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grpc_mapping() {
        assert_eq!(Kind::Unknown.grpc_code(), Code::Unknown);
        assert_eq!(Kind::Invalid.grpc_code(), Code::InvalidArgument);
        assert_eq!(Kind::Permission.grpc_code(), Code::PermissionDenied);
        assert_eq!(Kind::Exist.grpc_code(), Code::AlreadyExists);
        assert_eq!(Kind::NotExist.grpc_code(), Code::NotFound);
        assert_eq!(Kind::Internal.grpc_code(), Code::Internal);
    }

    #[test]
    fn test_http_mapping() {
        assert_eq!(Kind::Unknown.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Kind::Invalid.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(Kind::Permission.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Kind::Exist.http_status(), StatusCode::CONFLICT);
        assert_eq!(Kind::NotExist.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(Kind::Internal.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_raw_roundtrip_for_every_kind() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_raw(kind as u8), Some(kind));
            assert_eq!(Classification::of_raw(kind as u8), kind.classify());
        }
    }

    #[test]
    fn test_out_of_range_maps_to_unknown() {
        for raw in [6u8, 7, 100, u8::MAX] {
            assert_eq!(Kind::from_raw(raw), None);
            let c = Classification::of_raw(raw);
            assert_eq!(c.description, "unknown error kind");
            assert_eq!(c.grpc, Code::Unknown);
            assert_eq!(c.http, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(Kind::default(), Kind::Unknown);
    }
}
