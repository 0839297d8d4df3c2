//! Barcode symbol encoding. A symbol is a run of modules: `true` is a bar.

use serde::{Deserialize, Serialize};

use crate::error::BarcodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    #[default]
    Code128,
    Ean13,
}

impl Symbology {
    pub fn encode(self, code: &str) -> Result<Vec<bool>, BarcodeError> {
        match self {
            Symbology::Code128 => encode_code128(code),
            Symbology::Ean13 => encode_ean13(code),
        }
    }
}

// ======== Code 128 ========

/// Bar/space widths of symbol values 0..=105, bar first, 11 modules each.
const CODE128_PATTERNS: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212", "221213",
    "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221", "223211", "221132",
    "221231", "213212", "223112", "312131", "311222", "321122", "321221", "312212", "322112", "322211",
    "212123", "212321", "232121", "111323", "131123", "131321", "112313", "132113", "132311", "211313",
    "231113", "231311", "112133", "112331", "132131", "113123", "113321", "133121", "313121", "211331",
    "231131", "213113", "213311", "213131", "311123", "311321", "331121", "312113", "312311", "332111",
    "314111", "221411", "431111", "111224", "111422", "121124", "121421", "141122", "141221", "112214",
    "112412", "122114", "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111",
    "111242", "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311", "113141",
    "114131", "311141", "411131", "211412", "211214", "211232",
];
const CODE128_STOP: &str = "2331112";
const START_B: usize = 104;
const START_C: usize = 105;

/// Symbol values for `code`, start symbol included, check and stop excluded.
/// All-digit codes of even length use code set C, everything else code set B.
fn code128_values(code: &str) -> Result<Vec<usize>, BarcodeError> {
    if code.is_empty() {
        return Err(BarcodeError::Empty);
    }
    let bytes = code.as_bytes();
    if bytes.len() % 2 == 0 && bytes.iter().all(u8::is_ascii_digit) {
        let mut values = vec![START_C];
        values.extend(bytes.chunks(2).map(|p| ((p[0] - b'0') * 10 + (p[1] - b'0')) as usize));
        return Ok(values);
    }

    let mut values = vec![START_B];
    for ch in code.chars() {
        match ch {
            ' '..='~' => values.push(ch as usize - 32),
            other => return Err(BarcodeError::UnsupportedChar(other)),
        }
    }
    Ok(values)
}

/// Mod-103 check: start value plus each data value weighted by its position.
fn code128_checksum(values: &[usize]) -> usize {
    let weighted: usize = values.iter().enumerate().skip(1).map(|(i, v)| i * v).sum();
    (values[0] + weighted) % 103
}

fn push_widths(modules: &mut Vec<bool>, widths: &str) {
    for (i, w) in widths.bytes().enumerate() {
        let bar = i % 2 == 0;
        modules.extend(std::iter::repeat(bar).take((w - b'0') as usize));
    }
}

pub fn encode_code128(code: &str) -> Result<Vec<bool>, BarcodeError> {
    let mut values = code128_values(code)?;
    values.push(code128_checksum(&values));

    let mut modules = Vec::with_capacity(values.len() * 11 + 13);
    for v in values {
        push_widths(&mut modules, CODE128_PATTERNS[v]);
    }
    push_widths(&mut modules, CODE128_STOP);
    Ok(modules)
}

// ======== EAN-13 ========

/// Left-hand odd parity (L) digit codes; R is the complement, G is R reversed.
const EAN_L: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011",
    "0110001", "0101111", "0111011", "0110111", "0001011",
];
/// L/G choice for the left six digits, selected by the first digit.
const EAN_PARITY: [&str; 10] = [
    "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG",
    "LGGLLG", "LGGGLL", "LGLGLG", "LGLGGL", "LGGLGL",
];

/// Append the check digit to 12 digits, or verify it on 13.
pub fn normalize_ean13(code: &str) -> Result<String, BarcodeError> {
    let mut digits = String::with_capacity(13);
    for c in code.chars() {
        if !c.is_ascii_digit() {
            return Err(BarcodeError::UnsupportedChar(c));
        }
        digits.push(c);
    }
    match digits.len() {
        12 => {
            let check = compute_ean13_checksum(&digits);
            digits.push(char::from(b'0' + check));
            Ok(digits)
        }
        13 => {
            let expected = compute_ean13_checksum(&digits[..12]);
            let got = digits.as_bytes()[12] - b'0';
            if expected == got {
                Ok(digits)
            } else {
                Err(BarcodeError::Ean13Checksum { expected, got })
            }
        }
        n => Err(BarcodeError::Ean13Length(n)),
    }
}

/// Weights alternate 1, 3 from the left over 12 ASCII digits.
fn compute_ean13_checksum(digits: &str) -> u8 {
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

fn push_bits(modules: &mut Vec<bool>, bits: impl Iterator<Item = bool>) {
    modules.extend(bits);
}

pub fn encode_ean13(code: &str) -> Result<Vec<bool>, BarcodeError> {
    if code.is_empty() {
        return Err(BarcodeError::Empty);
    }
    let digits: Vec<usize> = normalize_ean13(code)?.bytes().map(|b| (b - b'0') as usize).collect();
    let parity = EAN_PARITY[digits[0]].as_bytes();

    let mut modules = Vec::with_capacity(95);
    push_bits(&mut modules, "101".bytes().map(|b| b == b'1'));
    for (i, &d) in digits[1..7].iter().enumerate() {
        let l = EAN_L[d].bytes().map(|b| b == b'1');
        if parity[i] == b'L' {
            push_bits(&mut modules, l);
        } else {
            // G = reversed complement of L
            let g: Vec<bool> = l.map(|bit| !bit).collect();
            push_bits(&mut modules, g.into_iter().rev());
        }
    }
    push_bits(&mut modules, "01010".bytes().map(|b| b == b'1'));
    for &d in &digits[7..13] {
        push_bits(&mut modules, EAN_L[d].bytes().map(|b| b == b'0'));
    }
    push_bits(&mut modules, "101".bytes().map(|b| b == b'1'));
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Vec<bool> {
        s.bytes().map(|b| b == b'1').collect()
    }

    #[test]
    fn test_patterns_are_eleven_modules() {
        for p in CODE128_PATTERNS {
            assert_eq!(p.bytes().map(|b| (b - b'0') as u32).sum::<u32>(), 11, "{p}");
        }
    }

    #[test]
    fn test_code128_set_b_layout() {
        // "ABC": start B, 3 data, check, stop
        let modules = encode_code128("ABC").unwrap();
        assert_eq!(modules.len(), 5 * 11 + 13);
        assert_eq!(&modules[..11], bits("11010010000").as_slice());
        assert_eq!(&modules[modules.len() - 13..], bits("1100011101011").as_slice());
    }

    #[test]
    fn test_code128_checksum() {
        // 104 + 33*1 + 34*2 + 35*3 = 310, 310 % 103 = 1
        let values = code128_values("ABC").unwrap();
        assert_eq!(values, [104, 33, 34, 35]);
        assert_eq!(code128_checksum(&values), 1);
    }

    #[test]
    fn test_even_digit_codes_use_set_c() {
        let values = code128_values("7290001234").unwrap();
        assert_eq!(values, [105, 72, 90, 0, 12, 34]);
        // odd length falls back to set B
        assert_eq!(code128_values("123").unwrap()[0], START_B);
    }

    #[test]
    fn test_code128_rejects_unsupported_input() {
        assert_eq!(encode_code128(""), Err(BarcodeError::Empty));
        assert_eq!(encode_code128("₪12"), Err(BarcodeError::UnsupportedChar('₪')));
    }

    #[test]
    fn test_ean13_check_digit() {
        assert_eq!(normalize_ean13("400638133393").unwrap(), "4006381333931");
        assert_eq!(normalize_ean13("4006381333931").unwrap(), "4006381333931");
        assert_eq!(
            normalize_ean13("4006381333932"),
            Err(BarcodeError::Ean13Checksum { expected: 1, got: 2 })
        );
        assert_eq!(normalize_ean13("12345"), Err(BarcodeError::Ean13Length(5)));
        assert_eq!(normalize_ean13("12345678901a"), Err(BarcodeError::UnsupportedChar('a')));
    }

    #[test]
    fn test_ean13_symbol_shape() {
        let modules = encode_ean13("400638133393").unwrap();
        assert_eq!(modules.len(), 95);
        assert_eq!(&modules[..3], bits("101").as_slice());
        assert_eq!(&modules[45..50], bits("01010").as_slice());
        assert_eq!(&modules[92..], bits("101").as_slice());
        // first left digit is 0 with parity L (leading 4 -> LGLLGG)
        assert_eq!(&modules[3..10], bits("0001101").as_slice());
    }

    #[test]
    fn test_symbology_dispatch() {
        assert_eq!(Symbology::default(), Symbology::Code128);
        assert_eq!(Symbology::Ean13.encode("400638133393").unwrap().len(), 95);
        assert!(Symbology::Ean13.encode("ABC").is_err());
    }
}
