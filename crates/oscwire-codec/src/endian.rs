//! Host/network byte-order conversion for OSC wire values.
//!
//! All multi-byte OSC values travel in network (big-endian) order. The
//! conversion is its own inverse: `from_wire(to_wire(x)) == x`, and both
//! are the identity on big-endian hosts.

/// Values convertible between host and network byte order.
pub trait WireOrder: Copy {
    /// Convert a host-order value to network order.
    fn to_wire(self) -> Self;

    /// Convert a network-order value to host order.
    fn from_wire(self) -> Self;
}

macro_rules! impl_wire_order_int {
    ($($t:ty),*) => {$(
        impl WireOrder for $t {
            fn to_wire(self) -> Self {
                self.to_be()
            }

            fn from_wire(self) -> Self {
                Self::from_be(self)
            }
        }
    )*};
}

impl_wire_order_int!(u16, i16, u32, i32, u64, i64);

impl WireOrder for f32 {
    fn to_wire(self) -> Self {
        Self::from_bits(self.to_bits().to_be())
    }

    fn from_wire(self) -> Self {
        Self::from_bits(u32::from_be(self.to_bits()))
    }
}

impl WireOrder for f64 {
    fn to_wire(self) -> Self {
        Self::from_bits(self.to_bits().to_be())
    }

    fn from_wire(self) -> Self {
        Self::from_bits(u64::from_be(self.to_bits()))
    }
}
