use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Zero-value test used to suppress unset fields from an envelope's `data`.
///
/// A value is empty when it equals the default of its type: `""`, `0`,
/// `false`, `None`, an empty vector, the Unix epoch, a nil UUID or JSON `null`.
pub trait EmptyValue {
    fn is_empty_value(&self) -> bool;
}

macro_rules! impl_empty_for_ints {
    ($($t:ty),*) => {
        $(impl EmptyValue for $t {
            fn is_empty_value(&self) -> bool {
                *self == 0
            }
        })*
    };
}

impl_empty_for_ints!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl EmptyValue for f32 {
    fn is_empty_value(&self) -> bool {
        *self == 0.0
    }
}

impl EmptyValue for f64 {
    fn is_empty_value(&self) -> bool {
        *self == 0.0
    }
}

impl EmptyValue for bool {
    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl EmptyValue for str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl EmptyValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: EmptyValue + ?Sized> EmptyValue for &T {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

// Presence wins: `Some(0)` is a value the caller chose to set.
impl<T> EmptyValue for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

impl<T> EmptyValue for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl EmptyValue for DateTime<Utc> {
    fn is_empty_value(&self) -> bool {
        *self == DateTime::<Utc>::UNIX_EPOCH
    }
}

impl EmptyValue for NaiveDate {
    fn is_empty_value(&self) -> bool {
        *self == NaiveDate::default()
    }
}

impl EmptyValue for Uuid {
    fn is_empty_value(&self) -> bool {
        self.is_nil()
    }
}

impl EmptyValue for Value {
    fn is_empty_value(&self) -> bool {
        self.is_null()
    }
}

impl EmptyValue for Map<String, Value> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}
