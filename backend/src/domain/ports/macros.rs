//! Helper macro generating upstream-facing port error enums.
//!
//! Each variant gets a `snake_case` constructor taking `impl Into<_>` per
//! field and an `is_<variant>` predicate.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_fields $variant () () $( $field : $ty, )*);
    };

    (@ctor_fields $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_fields $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_fields
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (@is $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Whether this is [`Self::", stringify!($variant), "`].")]
            pub fn [<is_ $variant:snake>](&self) -> bool {
                matches!(self, Self::$variant)
            }
        }
    };

    (@is $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Whether this is [`Self::", stringify!($variant), "`].")]
            pub fn [<is_ $variant:snake>](&self) -> bool {
                matches!(self, Self::$variant { .. })
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
                define_port_error!(@is $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ProbeError {
            Closed => "closed",
            Refused { message: String } => "refused: {message}",
            Status { status: u16 } => "status {status}",
            Rejected { status: u16, message: String } => "rejected {status}: {message}",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ProbeError::refused("connection reset");
        assert_eq!(err.to_string(), "refused: connection reset");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ProbeError::status(503_u16);
        assert_eq!(err.to_string(), "status 503");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ProbeError::rejected(404_u16, "missing");
        assert_eq!(err.to_string(), "rejected 404: missing");
    }

    #[test]
    fn predicates_match_only_their_variant() {
        let closed = ProbeError::closed();
        assert!(closed.is_closed());
        assert!(!closed.is_refused());

        let rejected = ProbeError::rejected(422_u16, "bad");
        assert!(rejected.is_rejected());
        assert!(!rejected.is_status());
    }
}
