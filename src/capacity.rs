use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use num_traits::{CheckedAdd, One, Zero};

/// A trait representing an edge capacity (and flow) type which is typically an integer.
///
/// Flow on a reverse edge is the negation of the flow on its forward edge, so the type must be
/// signed. Flow updates go through [`CheckedAdd`] and report overflow instead of wrapping.
pub trait Capacity:
    Copy
    + Sum<Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + Zero
    + One
    + CheckedAdd
    + Debug
    + Display
    + Default
{
}

impl Capacity for i32 {}

impl Capacity for i64 {}
