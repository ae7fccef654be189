// Floor division on 32-bit words; the quotient wraps like every other word op
pub fn floor_div(left: i32, right: i32) -> Option<i32> {
    if right == 0 {
        return None;
    }
    let (a, b) = (left as i64, right as i64);
    let mut q = a / b;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        q -= 1; // Round toward negative infinity
    }
    Some(q as i32)
}

// Modulo paired with floor_div: ((a % b) + b) % b
pub fn floor_mod(left: i32, right: i32) -> Option<i32> {
    if right == 0 {
        return None;
    }
    let (a, b) = (left as i64, right as i64);
    Some((((a % b) + b) % b) as i32)
}

// -1/0 truth values used by the compare opcodes
pub fn flag(value: bool) -> i32 {
    if value {
        -1
    } else {
        0
    }
}

// Split a packed ARGB word into its alpha byte and RGB bytes
pub fn unpack_argb(color: i32) -> (u32, [u8; 3]) {
    let c = color as u32;
    let alpha = (c >> 24) & 0xFF;
    let rgb = [(c >> 16) as u8, (c >> 8) as u8, c as u8];
    (alpha, rgb)
}

#[cfg(test)]
mod division_tests {
    use super::*;

    #[test]
    fn test_floor_div_rounds_down() {
        assert_eq!(floor_div(7, 2), Some(3));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(-7, -2), Some(3));
        assert_eq!(floor_div(6, 3), Some(2));
    }

    #[test]
    fn test_floor_mod_follows_divisor_sign() {
        assert_eq!(floor_mod(-7, 3), Some(2));
        assert_eq!(floor_mod(7, 3), Some(1));
        assert_eq!(floor_mod(7, -2), Some(-1));
        assert_eq!(floor_mod(-6, 3), Some(0));
    }

    #[test]
    fn test_zero_divisor() {
        assert_eq!(floor_div(1, 0), None);
        assert_eq!(floor_mod(1, 0), None);
    }

    #[test]
    fn test_min_over_minus_one_wraps() {
        assert_eq!(floor_div(i32::MIN, -1), Some(i32::MIN));
        assert_eq!(floor_mod(i32::MIN, -1), Some(0));
    }

    #[test]
    fn test_unpack_argb() {
        let (alpha, rgb) = unpack_argb(0xFF102030u32 as i32);
        assert_eq!(alpha, 0xFF);
        assert_eq!(rgb, [0x10, 0x20, 0x30]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn floor_division_law(a in any::<i32>(), b in 1i32..=i32::MAX) {
            let q = floor_div(a, b).unwrap() as i64;
            let r = floor_mod(a, b).unwrap() as i64;
            prop_assert_eq!(a as i64, b as i64 * q + r);
            prop_assert!(0 <= r && r < b as i64);
        }

        #[test]
        fn floor_division_law_negative_divisor(a in any::<i32>(), b in i32::MIN..=-2i32) {
            let q = floor_div(a, b).unwrap() as i64;
            let r = floor_mod(a, b).unwrap() as i64;
            prop_assert_eq!(a as i64, b as i64 * q + r);
            prop_assert!((b as i64) < r && r <= 0);
        }
    }
}
