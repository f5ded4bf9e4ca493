//! The field resolution contract between record types and the engine.
//!
//! This module provides the [`Record`] trait, implemented by the
//! `#[derive(Record)]` macro, plus the helper traits the derive relies on
//! for enum, timestamp and numeric fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::value::{FieldKind, NumberKind, Timestamp, Value};

/// A record shape the engine can filter, search and sort.
///
/// Field names are resolved through this trait only. A name for which
/// [`Record::field_kind`] returns `None` does not exist on the record.
///
/// # Derive Usage
///
/// ```ignore
/// use gridquery::Record;
///
/// #[derive(Record)]
/// #[grid(rename_all = "PascalCase")]
/// struct Person {
///     #[grid(Number)]
///     id: u32,
///     #[grid(Text)]
///     full_name: String,
///     #[grid(Bool)]
///     active: bool,
/// }
///
/// assert_eq!(Person::FULL_NAME, "FullName");
/// ```
///
/// # Manual Implementation
///
/// ```
/// use gridquery::{FieldKind, Number, NumberKind, Record, Value};
///
/// struct Person {
///     name: String,
///     age: u8,
/// }
///
/// impl Record for Person {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "Name" => Value::Text(&self.name),
///             "Age" => Value::Number(Number::from(self.age)),
///             _ => Value::None,
///         }
///     }
///
///     fn field_kind(field: &str) -> Option<FieldKind> {
///         match field {
///             "Name" => Some(FieldKind::Text),
///             "Age" => Some(FieldKind::Number(NumberKind::Unsigned)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] when it is null.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Resolves a field name to its static type.
    fn field_kind(field: &str) -> Option<FieldKind>;

    /// Parses a raw variant name for an enum-typed field into its
    /// discriminant.
    ///
    /// The default knows no names; numeric discriminants are still accepted
    /// by the clause compiler.
    fn parse_enum(field: &str, raw: &str) -> Option<u32> {
        let _ = (field, raw);
        None
    }
}

/// Conversion of enum types to stable discriminants.
///
/// Used by `#[grid(Enum)]` fields. Use explicit values rather than
/// declaration order so stored filters keep their meaning.
///
/// ```
/// use gridquery::GridEnum;
///
/// enum Status {
///     Active,
///     Suspended,
/// }
///
/// impl GridEnum for Status {
///     fn discriminant(&self) -> u32 {
///         match self {
///             Status::Active => 0,
///             Status::Suspended => 1,
///         }
///     }
///
///     fn from_name(name: &str) -> Option<u32> {
///         match name {
///             "Active" => Some(0),
///             "Suspended" => Some(1),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait GridEnum {
    /// Returns the discriminant value for this variant.
    fn discriminant(&self) -> u32;

    /// Maps a variant name to its discriminant.
    fn from_name(name: &str) -> Option<u32>
    where
        Self: Sized,
    {
        let _ = name;
        None
    }
}

/// Conversion of datetime types to [`Timestamp`].
pub trait GridTimestamp {
    fn grid_timestamp(&self) -> Timestamp;
}

impl GridTimestamp for i64 {
    fn grid_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl GridTimestamp for u64 {
    fn grid_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl<Tz: TimeZone> GridTimestamp for DateTime<Tz> {
    fn grid_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.timestamp_millis())
    }
}

impl GridTimestamp for NaiveDateTime {
    fn grid_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.and_utc().timestamp_millis())
    }
}

impl GridTimestamp for NaiveDate {
    fn grid_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis())
    }
}

/// Numeric representation of a primitive type.
///
/// The derive uses this to report [`FieldKind::Number`] with the right
/// [`NumberKind`], so raw text is parsed as the field's native type.
pub trait GridNumber {
    const KIND: NumberKind;
}

macro_rules! grid_number {
    ($kind:ident: $($ty:ty),*) => {
        $(
            impl GridNumber for $ty {
                const KIND: NumberKind = NumberKind::$kind;
            }
        )*
    };
}

grid_number!(Signed: i8, i16, i32, i64, isize);
grid_number!(Unsigned: u8, u16, u32, u64, usize);
grid_number!(Float: f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    struct Item {
        name: String,
        count: i32,
    }

    impl Record for Item {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::Text(&self.name),
                "count" => Value::Number(Number::from(self.count)),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            match field {
                "name" => Some(FieldKind::Text),
                "count" => Some(FieldKind::Number(<i32 as GridNumber>::KIND)),
                _ => None,
            }
        }
    }

    #[test]
    fn manual_record() {
        let item = Item {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.field_value("name"), Value::Text("test"));
        assert_eq!(item.field_value("count"), Value::Number(Number::I64(42)));
        assert_eq!(item.field_value("unknown"), Value::None);
        assert_eq!(
            Item::field_kind("count"),
            Some(FieldKind::Number(NumberKind::Signed))
        );
        assert_eq!(Item::field_kind("unknown"), None);
        assert_eq!(Item::parse_enum("name", "x"), None);
    }

    #[test]
    fn chrono_timestamps() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(date.grid_timestamp(), Timestamp(86_400_000));

        let utc = date.and_hms_opt(0, 0, 1).unwrap().and_utc();
        assert_eq!(utc.grid_timestamp(), Timestamp(86_401_000));
        assert_eq!(5i64.grid_timestamp(), Timestamp(5));
    }

    #[test]
    fn unsigned_timestamps_saturate() {
        assert_eq!(7u64.grid_timestamp(), Timestamp(7));
        assert_eq!(u64::MAX.grid_timestamp(), Timestamp(i64::MAX));
    }
}
