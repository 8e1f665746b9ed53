use super::*;
use serde_json::json;

fn decode(source: &str) -> Value {
    Value::Object(decode_notation(source).expect("valid notation"))
}

mod values {
    use super::*;

    #[test]
    fn test_single_pair() {
        assert_eq!(decode("foo:1"), json!({"foo": 1}));
    }

    #[test]
    fn test_pairs_and_bare_strings() {
        assert_eq!(
            decode("sys:gateway,handle:event"),
            json!({"sys": "gateway", "handle": "event"})
        );
    }

    #[test]
    fn test_typed_scalars() {
        assert_eq!(
            decode("a:true,b:false,c:null,d:-2,e:1.5,f:text"),
            json!({"a": true, "b": false, "c": null, "d": -2, "e": 1.5, "f": "text"})
        );
    }

    #[test]
    fn test_number_like_words_stay_strings() {
        assert_eq!(decode("a:inf,b:NaN"), json!({"a": "inf", "b": "NaN"}));
    }

    #[test]
    fn test_bare_key_means_true() {
        assert_eq!(
            decode("sys,role:user"),
            json!({"sys": true, "role": "user"})
        );
    }

    #[test]
    fn test_nested_object_and_array() {
        assert_eq!(
            decode("args:{limit:10,tags:[a,'b c',2]}"),
            json!({"args": {"limit": 10, "tags": ["a", "b c", 2]}})
        );
    }

    #[test]
    fn test_quoted_strings_keep_delimiters() {
        assert_eq!(
            decode(r#"a:'x,y',b:"{z}",'c d':1"#),
            json!({"a": "x,y", "b": "{z}", "c d": 1})
        );
    }

    #[test]
    fn test_escapes_in_quoted_strings() {
        assert_eq!(decode(r"a:'it\'s'"), json!({"a": "it's"}));
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(
            decode("  a : 1 ,  b : { c : two words } "),
            json!({"a": 1, "b": {"c": "two words"}})
        );
    }

    #[test]
    fn test_explicit_top_level_braces() {
        assert_eq!(decode("{a:1,b:2}"), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_trailing_commas_are_allowed() {
        assert_eq!(decode("a:1,b:[1,2,],"), json!({"a": 1, "b": [1, 2]}));
    }

    #[test]
    fn test_empty_input_is_empty_object() {
        assert_eq!(decode(""), json!({}));
        assert_eq!(decode("   "), json!({}));
    }

    #[test]
    fn test_later_duplicate_key_wins() {
        assert_eq!(decode("a:1,a:2"), json!({"a": 2}));
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_unclosed_object() {
        let err = decode_notation("a:{b").unwrap_err();
        assert_eq!(err.position, 4);
    }

    #[test]
    fn test_unclosed_array() {
        assert!(decode_notation("a:[1,2").is_err());
    }

    #[test]
    fn test_unterminated_string() {
        let err = decode_notation("a:'open").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_stray_closing_brace() {
        let err = decode_notation("a:1}").unwrap_err();
        assert_eq!(err.position, 3);
    }

    #[test]
    fn test_missing_key() {
        assert!(decode_notation(":1").is_err());
    }
}
