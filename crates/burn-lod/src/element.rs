use core::fmt::Debug;
use core::ops::AddAssign;
use num_traits::Zero;

/// An element that can be stored in a [LodTensor](crate::LodTensor).
pub trait LodElement:
    Copy + Debug + PartialEq + Zero + AddAssign + Send + Sync + 'static
{
}

macro_rules! make_elem {
    (
        $($ty:ty),*
    ) => {
        $(impl LodElement for $ty {})*
    };
}

make_elem!(f64, f32, i64, i32, i16, i8, u64, u32, u16, u8);
