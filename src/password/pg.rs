//! PostgreSQL column mapping
//!
//! Both types map to any text-like column. The column holds the hash, never
//! the plaintext. SQL `NULL` reads back as an empty value.

use std::error::Error;

use bytes::BytesMut;
use postgres_types::{to_sql_checked, FromSql, IsNull, ToSql, Type};

use super::{HashedPassword, Password};

type BoxError = Box<dyn Error + Sync + Send>;

impl ToSql for HashedPassword {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        <&str as ToSql>::to_sql(&self.as_str(), ty, out)
    }

    fn accepts(ty: &Type) -> bool {
        <&str as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

impl<'a> FromSql<'a> for HashedPassword {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let hashed = <&str as FromSql>::from_sql(ty, raw)?;
        Ok(HashedPassword::from_hash(hashed))
    }

    fn from_sql_null(_: &Type) -> Result<Self, BoxError> {
        Ok(HashedPassword::default())
    }

    fn accepts(ty: &Type) -> bool {
        <&str as FromSql>::accepts(ty)
    }
}

impl ToSql for Password {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        self.hashed().to_sql(ty, out)
    }

    fn accepts(ty: &Type) -> bool {
        <HashedPassword as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

impl<'a> FromSql<'a> for Password {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        HashedPassword::from_sql(ty, raw).map(Password::from)
    }

    fn from_sql_null(ty: &Type) -> Result<Self, BoxError> {
        HashedPassword::from_sql_null(ty).map(Password::from)
    }

    fn accepts(ty: &Type) -> bool {
        <HashedPassword as FromSql>::accepts(ty)
    }
}
