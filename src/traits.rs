use std::{fmt, ops};

/// Types that have a "zero" value (an additive identity).
pub trait Zero {
    /// The *0* value of this type.
    const ZERO: Self;
}

/// Types that have a "one" value (a multiplicative identity).
pub trait One {
    /// The *1* value of this type.
    const ONE: Self;
}

/// Types that support computing their square root.
pub trait Sqrt {
    fn sqrt(self) -> Self;
}

/// Types that support computing their absolute value (magnitude).
pub trait Abs {
    fn abs(self) -> Self;
}

/// A trait for numeric types that support basic arithmetic operations.
pub trait Number:
    Zero
    + One
    + ops::Neg<Output = Self>
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + PartialEq
    + Copy
{
}
impl<T> Number for T where
    T: Zero
        + One
        + ops::Neg<Output = Self>
        + ops::Add<Output = Self>
        + ops::Sub<Output = Self>
        + ops::Mul<Output = Self>
        + ops::Div<Output = Self>
        + PartialEq
        + Copy
{
}

/// Element types the factorizations can operate on.
///
/// Partial pivoting needs to compare magnitudes, so on top of [`Number`] this requires an ordering
/// and [`Abs`]. [`Scalar::EPSILON`] is the unit of roundoff that the default singularity threshold
/// of [`LuDecomposition`][crate::LuDecomposition] is scaled from.
pub trait Scalar: Number + PartialOrd + Abs + fmt::Debug {
    /// Difference between 1 and the next larger representable value.
    const EPSILON: Self;
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
}

macro_rules! zero_one {
    ($zero:literal, $one:literal: $($types:ty),+) => {
        $(
            impl Zero for $types {
                const ZERO: Self = $zero;
            }

            impl One for $types {
                const ONE: Self = $one;
            }
        )+
    };
}
zero_one!(0, 1: u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
zero_one!(0.0, 1.0: f32, f64);

macro_rules! float_ops {
    ($($types:ty),+) => {
        $(
            impl Sqrt for $types {
                #[inline]
                fn sqrt(self) -> Self {
                    <$types>::sqrt(self)
                }
            }

            impl Abs for $types {
                #[inline]
                fn abs(self) -> Self {
                    <$types>::abs(self)
                }
            }
        )+
    };
}
float_ops!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_number<T: Number>() {}

    #[test]
    fn number_impls() {
        assert_number::<i32>();
        assert_number::<f32>();
        assert_number::<f64>();
    }

    #[test]
    fn float_ops() {
        assert_eq!(Sqrt::sqrt(16.0f32), 4.0);
        assert_eq!(Sqrt::sqrt(2.25f64), 1.5);
        assert_eq!(Abs::abs(-3.5f64), 3.5);
        assert_eq!(Abs::abs(0.5f32), 0.5);
    }

    #[test]
    fn epsilon() {
        assert_eq!(1.0f32 + <f32 as Scalar>::EPSILON / 2.0, 1.0);
        assert_ne!(1.0f32 + <f32 as Scalar>::EPSILON, 1.0);
        assert_eq!(1.0f64 + <f64 as Scalar>::EPSILON / 2.0, 1.0);
        assert_ne!(1.0f64 + <f64 as Scalar>::EPSILON, 1.0);
    }
}
