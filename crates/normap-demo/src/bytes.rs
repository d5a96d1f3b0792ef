//! Byte views of vertex data for `glBufferData`.

/// View `#[repr(C)]` values as raw bytes for a buffer upload.
///
/// # Safety
///
/// Only implement on `#[repr(C)]` structs whose fields are all plain numeric
/// types (f32, i32, u32, or arrays of them) with no padding between fields.
pub unsafe trait AsBytes: Sized {
    /// View `self` as a byte slice of length `size_of::<Self>()`.
    fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(self as *const Self as *const u8, std::mem::size_of::<Self>())
        }
    }

    /// View a slice of values as one contiguous byte slice.
    fn slice_as_bytes(values: &[Self]) -> &[u8] {
        unsafe { std::slice::from_raw_parts(values.as_ptr() as *const u8, std::mem::size_of_val(values)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    struct Pair {
        a: f32,
        b: f32,
    }

    unsafe impl AsBytes for Pair {}

    #[test]
    fn slices_are_contiguous() {
        let pairs = [Pair { a: 1.0, b: 2.0 }, Pair { a: 3.0, b: 4.0 }];
        let bytes = Pair::slice_as_bytes(&pairs);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[8..12], &3.0f32.to_ne_bytes());
        assert_eq!(pairs[1].as_bytes(), &bytes[8..]);
    }
}
