// Copyright 2020 - 2021 Alex Dukhno
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::*;

#[cfg(test)]
mod kleene_logic {
    use super::*;
    use super::TriBool::*;

    #[test]
    fn conjunction() {
        assert_eq!(True.and(True), True);
        assert_eq!(True.and(False), False);
        assert_eq!(False.and(False), False);
        assert_eq!(Unknown.and(True), Unknown);
        assert_eq!(Unknown.and(False), False);
        assert_eq!(Unknown.and(Unknown), Unknown);
    }

    #[test]
    fn disjunction() {
        assert_eq!(True.or(True), True);
        assert_eq!(True.or(False), True);
        assert_eq!(False.or(False), False);
        assert_eq!(Unknown.or(True), True);
        assert_eq!(Unknown.or(False), Unknown);
        assert_eq!(Unknown.or(Unknown), Unknown);
    }

    #[test]
    fn negation() {
        assert_eq!(True.negate(), False);
        assert_eq!(False.negate(), True);
        assert_eq!(Unknown.negate(), Unknown);
    }

    #[test]
    fn only_true_selects() {
        assert!(True.is_true());
        assert!(!False.is_true());
        assert!(!Unknown.is_true());
    }
}

#[cfg(test)]
mod type_checks {
    use super::*;

    #[test]
    fn null_passes_every_type() {
        assert!(SqlType::Int.type_check(&ScalarValue::Null));
        assert!(SqlType::Char(3).type_check(&ScalarValue::Null));
        assert!(SqlType::Date.type_check(&ScalarValue::Null));
    }

    #[test]
    fn matching_cases() {
        assert!(SqlType::Int.type_check(&ScalarValue::Int(42)));
        assert!(SqlType::Date.type_check(&ScalarValue::Date(
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        )));
    }

    #[test]
    fn any_string_passes_char() {
        assert!(SqlType::Char(3).type_check(&ScalarValue::String("".to_owned())));
        assert!(SqlType::Char(3).type_check(&ScalarValue::String("abcdef".to_owned())));
    }

    #[test]
    fn mismatched_cases() {
        assert!(!SqlType::Int.type_check(&ScalarValue::String("1".to_owned())));
        assert!(!SqlType::Char(3).type_check(&ScalarValue::Int(1)));
        assert!(!SqlType::Date.type_check(&ScalarValue::String("2021-01-01".to_owned())));
    }
}

#[cfg(test)]
mod char_truncation {
    use super::*;

    #[test]
    fn over_long_strings_are_shortened() {
        assert_eq!(
            SqlType::Char(3).coerce(ScalarValue::String("abcdef".to_owned())),
            ScalarValue::String("abc".to_owned())
        );
    }

    #[test]
    fn short_strings_are_not_padded() {
        assert_eq!(
            SqlType::Char(10).coerce(ScalarValue::String("ab".to_owned())),
            ScalarValue::String("ab".to_owned())
        );
    }

    #[test]
    fn counts_code_points_not_bytes() {
        assert_eq!(
            SqlType::Char(2).coerce(ScalarValue::String("αβγ".to_owned())),
            ScalarValue::String("αβ".to_owned())
        );
    }

    #[test]
    fn leaves_other_values_untouched() {
        assert_eq!(SqlType::Int.coerce(ScalarValue::Int(7)), ScalarValue::Int(7));
        assert_eq!(SqlType::Char(1).coerce(ScalarValue::Null), ScalarValue::Null);
    }
}

#[test]
fn rendering() {
    assert_eq!(ScalarValue::Int(-5).as_text(), "-5");
    assert_eq!(ScalarValue::String("Abc".to_owned()).as_text(), "Abc");
    assert_eq!(
        ScalarValue::Date(NaiveDate::from_ymd_opt(2021, 7, 4).unwrap()).as_text(),
        "2021-07-04"
    );
    assert_eq!(ScalarValue::Null.as_text(), "NULL");
    assert_eq!(SqlType::Char(12).to_string(), "char(12)");
    assert_eq!(SqlType::Int.to_string(), "int");
}
