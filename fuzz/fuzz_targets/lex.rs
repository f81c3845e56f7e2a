#![no_main]

use libfuzzer_sys::fuzz_target;
use paramrun_syntax::writer::write_record;
use paramrun_syntax::{DelimitedFormat, Delimiter, lexer};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    for format in [
        DelimitedFormat::default(),
        DelimitedFormat::new().with_quote('"').with_delimiter(Delimiter::Str("=>".into())),
    ] {
        // Every record that lexes must survive a write/lex round trip
        if let Ok(records) = lexer::lex(s, &format) {
            for record in records {
                let fields: Vec<Option<&str>> = record
                    .fields
                    .iter()
                    .map(|f| (!f.is_blank()).then_some(f.text.as_str()))
                    .collect();
                let line = write_record(&fields, &format);
                assert!(lexer::lex(&line, &format).is_ok(), "rewritten line {line:?} failed to lex");
            }
        }
    }
});
