// ==========================================
// 智能体测试夹具 - Excel 列名转换
// ==========================================
// 职责: 列字母 ↔ 列序号（1-based），A=1, Z=26, AA=27
// ==========================================

use crate::importer::error::{ImportError, ImportResult};

/// Excel 最大列数（XFD）
pub const MAX_COLUMN_NUMBER: usize = 16_384;

/// 列字母 → 列序号（1-based，大小写不敏感）
pub fn column_name_to_number(name: &str) -> ImportResult<usize> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ImportError::InvalidColumnName(name.to_string()));
    }

    let mut number = 0usize;
    for ch in trimmed.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(ImportError::InvalidColumnName(name.to_string()));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        number = number * 26 + digit;
        if number > MAX_COLUMN_NUMBER {
            return Err(ImportError::InvalidColumnName(name.to_string()));
        }
    }
    Ok(number)
}

/// 列序号（1-based）→ 列字母
pub fn column_number_to_name(mut number: usize) -> String {
    let mut letters = Vec::new();
    while number > 0 {
        let rem = (number - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        number = (number - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name_to_number() {
        assert_eq!(column_name_to_number("A").unwrap(), 1);
        assert_eq!(column_name_to_number("z").unwrap(), 26);
        assert_eq!(column_name_to_number("AA").unwrap(), 27);
        assert_eq!(column_name_to_number("AZ").unwrap(), 52);
        assert_eq!(column_name_to_number("XFD").unwrap(), 16_384);
    }

    #[test]
    fn test_invalid_column_names() {
        assert!(column_name_to_number("").is_err());
        assert!(column_name_to_number("A1").is_err());
        assert!(column_name_to_number("门店").is_err());
        assert!(column_name_to_number("XFE").is_err());
    }

    #[test]
    fn test_number_to_name() {
        assert_eq!(column_number_to_name(1), "A");
        assert_eq!(column_number_to_name(28), "AB");
        assert_eq!(column_number_to_name(16_384), "XFD");
    }
}
