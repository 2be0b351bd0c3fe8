// FIXME(const_generic)
/// Widens an ASCII byte string into a `[u16; N]` at compile time.
macro_rules! utf16s {
    ($src:expr) => {{
        const SRC: &[u8] = $src;
        const N: usize = SRC.len();
        let mut dst = [0u16; N];
        let mut i = 0;
        while i < N {
            dst[i] = SRC[i] as u16;
            i += 1;
        }
        dst
    }};
}
