use crate::error::{MergeError, Result};
use gdal::raster::GdalType;
use num_traits::NumCast;
use std::fmt::Debug;

/// Sample types a mosaic can be built from.
pub trait Pixel:
    GdalType + NumCast + Copy + PartialOrd + Debug + Default + Send + Sync + 'static
{
    const NAME: &'static str;
    const IS_FLOAT: bool;
}

macro_rules! impl_pixel {
    ($($ty:ty => $name:literal, $float:literal);* $(;)?) => {
        $(impl Pixel for $ty {
            const NAME: &'static str = $name;
            const IS_FLOAT: bool = $float;
        })*
    };
}

impl_pixel!(
    u8 => "UInt8", false;
    u16 => "UInt16", false;
    i16 => "Int16", false;
    u32 => "UInt32", false;
    i32 => "Int32", false;
    f32 => "Float32", true;
    f64 => "Float64", true;
);

/// Convert a sentinel or no-data value into the sample type. Integer types
/// reject values that would be truncated or saturated on the way.
pub fn from_f64<T: Pixel>(value: f64) -> Result<T> {
    let converted: Option<T> = NumCast::from(value);
    match converted {
        Some(v) if T::IS_FLOAT => Ok(v),
        Some(v) if v.to_f64() == Some(value) => Ok(v),
        _ => Err(MergeError::UnrepresentableValue {
            value,
            data_type: T::NAME,
        }),
    }
}

/// Equality that treats NaN as equal to NaN.
#[inline]
pub fn same_value<T: PartialOrd>(a: T, b: T) -> bool {
    #[allow(clippy::eq_op)]
    let both_nan = a != a && b != b;
    a == b || both_nan
}
