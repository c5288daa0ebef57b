//! The host boundary: extension metadata and the predicate registry.
//!
//! A filesystem-search host discovers the extension through three string
//! constants and a fixed, ordered list of exported predicates. Every
//! predicate takes the file path of the entry under evaluation plus a
//! fixed number of extra string arguments, and returns a boolean.

use crate::predicate::Evaluator;

/// Extension name the host registers the predicates under.
pub const EXTENSION_NAME: &str = "mailpred";

/// Semantic version of the extension.
pub const EXTENSION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Human-readable description shown by the host.
pub const EXTENSION_DESCRIPTION: &str = "Filter emails by header, body, attachments and date.";

/// One exported predicate: its name, the number of string arguments it
/// takes after the file path, and its dispatch function.
pub struct Export {
    pub name: &'static str,
    pub extra_args: usize,
    pub call: fn(&mut Evaluator, &str, &[&str]) -> bool,
}

/// The ordered export table.
///
/// Argument-count mismatches collapse to `false` like every other
/// failure at this boundary.
pub fn exports() -> &'static [Export] {
    &EXPORTS
}

/// Look up an exported predicate by name.
pub fn find_export(name: &str) -> Option<&'static Export> {
    EXPORTS.iter().find(|e| e.name == name)
}

static EXPORTS: [Export; 14] = [
    Export {
        name: "mail_check_header",
        extra_args: 2,
        call: |ev, path, args| match args {
            [key, value] => ev.check_header(path, key, value),
            _ => false,
        },
    },
    Export {
        name: "mail_has_header",
        extra_args: 1,
        call: |ev, path, args| match args {
            [key] => ev.has_header(path, key),
            _ => false,
        },
    },
    Export {
        name: "mail_contains",
        extra_args: 1,
        call: |ev, path, args| match args {
            [query] => ev.contains(path, query),
            _ => false,
        },
    },
    Export {
        name: "mail_find_attachment",
        extra_args: 1,
        call: |ev, path, args| match args {
            [query] => ev.find_attachment(path, query),
            _ => false,
        },
    },
    Export {
        name: "mail_has_attachment",
        extra_args: 0,
        call: |ev, path, args| args.is_empty() && ev.has_attachment(path),
    },
    Export {
        name: "mail_date_equals",
        extra_args: 2,
        call: |ev, path, args| match args {
            [key, datestr] => ev.date_equals(path, key, datestr),
            _ => false,
        },
    },
    Export {
        name: "mail_date_before",
        extra_args: 2,
        call: |ev, path, args| match args {
            [key, datestr] => ev.date_before(path, key, datestr),
            _ => false,
        },
    },
    Export {
        name: "mail_date_after",
        extra_args: 2,
        call: |ev, path, args| match args {
            [key, datestr] => ev.date_after(path, key, datestr),
            _ => false,
        },
    },
    Export {
        name: "mail_from",
        extra_args: 1,
        call: |ev, path, args| match args {
            [query] => ev.from_(path, query),
            _ => false,
        },
    },
    Export {
        name: "mail_to",
        extra_args: 1,
        call: |ev, path, args| match args {
            [query] => ev.to(path, query),
            _ => false,
        },
    },
    Export {
        name: "mail_subject",
        extra_args: 1,
        call: |ev, path, args| match args {
            [query] => ev.subject(path, query),
            _ => false,
        },
    },
    Export {
        name: "mail_sent",
        extra_args: 1,
        call: |ev, path, args| match args {
            [datestr] => ev.sent(path, datestr),
            _ => false,
        },
    },
    Export {
        name: "mail_sent_before",
        extra_args: 1,
        call: |ev, path, args| match args {
            [datestr] => ev.sent_before(path, datestr),
            _ => false,
        },
    },
    Export {
        name: "mail_sent_after",
        extra_args: 1,
        call: |ev, path, args| match args {
            [datestr] => ev.sent_after(path, datestr),
            _ => false,
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_table_order_and_arity() {
        let names: Vec<&str> = exports().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                "mail_check_header",
                "mail_has_header",
                "mail_contains",
                "mail_find_attachment",
                "mail_has_attachment",
                "mail_date_equals",
                "mail_date_before",
                "mail_date_after",
                "mail_from",
                "mail_to",
                "mail_subject",
                "mail_sent",
                "mail_sent_before",
                "mail_sent_after",
            ]
        );
        assert_eq!(find_export("mail_has_attachment").unwrap().extra_args, 0);
        assert_eq!(find_export("mail_check_header").unwrap().extra_args, 2);
        assert!(find_export("mail_bogus").is_none());
    }

    #[test]
    fn test_argument_count_mismatch_is_false() {
        let mut ev = Evaluator::new();
        let export = find_export("mail_contains").unwrap();
        assert!(!(export.call)(&mut ev, "/no/such/file", &[]));
        assert!(!(export.call)(&mut ev, "/no/such/file", &["a", "b"]));
    }
}
