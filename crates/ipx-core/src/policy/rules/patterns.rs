//! Common regex patterns for insurance document extraction.
//!
//! Numerals accept western (`1,234,567`) and Indian (`12,34,567`) digit
//! grouping with up to two decimal places.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Currency with a rupee symbol: ₹1,00,000.00
    pub static ref CURRENCY_SYMBOL: Regex = Regex::new(
        r"₹[ \t]*((?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d{1,2})?)"
    ).unwrap();

    // Rs. 100000
    pub static ref CURRENCY_RS: Regex = Regex::new(
        r"(?i)\brs\.?[ \t]*((?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d{1,2})?)"
    ).unwrap();

    // INR 100000
    pub static ref CURRENCY_INR: Regex = Regex::new(
        r"(?i)\binr\.?[ \t]*((?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d{1,2})?)"
    ).unwrap();

    // 100000/- or 100000 only
    pub static ref CURRENCY_SUFFIX: Regex = Regex::new(
        r"(?i)\b((?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d{1,2})?)[ \t]*(?:/-|only\b)"
    ).unwrap();

    // Label: 16,700.00 (the extractor checks what follows the numeral)
    pub static ref CURRENCY_LABELED: Regex = Regex::new(
        r"(?:^|[^\d]):[ \t]*((?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d{1,2})?)"
    ).unwrap();

    // Insured declared value: IDV (₹): 5,50,000
    pub static ref DECLARED_VALUE: Regex = Regex::new(
        r"(?i)\b(?:insured\s+declared\s+value|declared\s+value|idv)\b[^\d\n]{0,30}?((?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d{1,2})?)"
    ).unwrap();

    // Dates: 15/01/2024, 15-01-2024, 15.01.2024
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{4})\b"
    ).unwrap();

    // 2024-01-15
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b"
    ).unwrap();

    // 15 Jan 2024, 15th January 2044
    pub static ref DATE_WRITTEN: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?[ \t]+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?[ \t]+(\d{4})\b"
    ).unwrap();

    // January 15, 2024
    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[ \t]+(\d{1,2})(?:st|nd|rd|th)?,?[ \t]+(\d{4})\b"
    ).unwrap();

    // Policy No: LI/2024/123456
    pub static ref POLICY_LABELED: Regex = Regex::new(
        r"(?i:policy|certificate)[ \t]*(?i:number|no\.?|#|id)[ \t]*[:.\-]?[ \t]*([A-Za-z0-9][A-Za-z0-9/\-]{5,24})"
    ).unwrap();

    // Unlabeled codes: MOT-12345678, HLT/00012345
    pub static ref POLICY_CODE: Regex = Regex::new(
        r"\b([A-Z]{2,4}[-/]\d{6,15})\b"
    ).unwrap();

    // Percentages: 18%, 12.5 %
    pub static ref PERCENTAGE: Regex = Regex::new(
        r"\b(\d{1,3}(?:\.\d{1,2})?)[ \t]*%"
    ).unwrap();

    // Indian vehicle registration: UP 14 DX 9941, MH-12-AB-1234, TN09BX7890
    pub static ref VEHICLE_REGISTRATION: Regex = Regex::new(
        r"\b([A-Z]{2})[ \-]?(\d{1,2})[ \-]?([A-Z]{1,3})[ \-]?(\d{4})\b"
    ).unwrap();

    // Financial keywords marking a table as relevant, as whole words
    pub static ref FINANCIAL_KEYWORD: Regex = Regex::new(
        r"(?i)\b(?:premium|amount|coverage|sum\s+(?:insured|assured)|(?:sub)?total|benefit|idv|[csi]?gst|value)s?\b"
    ).unwrap();

    // Any numeral inside a table row
    pub static ref ROW_NUMERAL: Regex = Regex::new(
        r"(?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d+)?"
    ).unwrap();
}
