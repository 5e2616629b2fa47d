//! Generates the `sqlx::Type`/`Encode`/`Decode` trio for a fieldless enum
//! stored as TEXT in SQLite, following the same hand-written pattern the
//! teacher repo uses for `SessionType` (see the original `models/session.rs`),
//! lifted into a macro so the nine closed variant sets in this crate's data
//! model (`ActivityType`, `NotificationType`, `BreakType`, ...) don't each
//! repeat it by hand.
macro_rules! sqlite_str_enum {
    ($ty:ty { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl sqlx::Type<sqlx::Sqlite> for $ty {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                let value = match self {
                    $(<$ty>::$variant => $str,)+
                };
                <&str as sqlx::Encode<sqlx::Sqlite>>::encode_by_ref(&value, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $ty {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
                let raw = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                match raw.as_str() {
                    $($str => Ok(<$ty>::$variant),)+
                    other => Err(format!("invalid {}: {}", stringify!($ty), other).into()),
                }
            }
        }
    };
}

pub(crate) use sqlite_str_enum;
