//! Clinic entities and their embedded value types

/// Declares a fieldless enum persisted as its integer code.
///
/// JSON carries the SCREAMING_SNAKE_CASE variant name, storage and gRPC carry
/// the code. `from_code` rejects unknown codes instead of guessing.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[repr(i32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code),+
        }

        impl $name {
            pub fn code(self) -> i32 {
                self as i32
            }

            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = crate::error::DatabaseError;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                Self::from_code(code).ok_or_else(|| {
                    crate::error::DatabaseError::encoding(
                        stringify!($name),
                        format!("unknown code {code}"),
                    )
                })
            }
        }
    };
}

pub(crate) use coded_enum;

pub mod appointment;
pub mod codec;
pub mod doctor;
pub mod medical_record;
pub mod patient;
pub mod prescription;

pub use appointment::*;
pub use doctor::*;
pub use medical_record::*;
pub use patient::*;
pub use prescription::*;
