/*!
 * Tests for ISO language code utilities
 */

use subgen::language_utils::{
    get_language_name, language_codes_match, normalize_to_part1_or_part2t, normalize_to_part2t,
    validate_language_code, LanguageCodeType,
};

#[test]
fn test_validateLanguageCode_withMixedCase_shouldAccept() {
    assert_eq!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("Deu").unwrap(), LanguageCodeType::Part2T);
}

#[test]
fn test_validateLanguageCode_withInvalidCodes_shouldFail() {
    for code in ["", "e", "xx", "abcd", "english"] {
        assert!(validate_language_code(code).is_err(), "{} should be rejected", code);
    }
}

#[test]
fn test_normalizeToPart2t_withBibliographicCode_shouldUseTerminology() {
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
}

#[test]
fn test_normalizeToPart1OrPart2t_shouldPreferTwoLetterCode() {
    assert_eq!(normalize_to_part1_or_part2t("fra").unwrap(), "fr");
    assert_eq!(normalize_to_part1_or_part2t("es").unwrap(), "es");
    assert!(normalize_to_part1_or_part2t("abcd").is_err());
}

#[test]
fn test_languageCodesMatch_shouldCompareAcrossForms() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("ger", "de"));
    assert!(!language_codes_match("pt", "es"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert_eq!(get_language_name("jpn").unwrap(), "Japanese");
    assert!(get_language_name("qq").is_err());
}
