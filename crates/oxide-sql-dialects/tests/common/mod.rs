#![allow(dead_code)]

use std::sync::OnceLock;

use oxide_sql_dialects::{query_generator, DialectKind, DialectOptions, Escaper, QueryGenerator};

/// Installs a fmt subscriber writing through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Default options, shared so escapers can borrow them for `'static`.
pub fn default_options() -> &'static DialectOptions {
    static OPTIONS: OnceLock<DialectOptions> = OnceLock::new();
    OPTIONS.get_or_init(DialectOptions::default)
}

pub fn escaper(kind: DialectKind) -> Escaper<'static> {
    Escaper::new(kind.capabilities(), default_options())
}

pub fn generator(kind: DialectKind) -> Box<dyn QueryGenerator> {
    init_tracing();
    query_generator(kind, DialectOptions::default())
}

/// Generator that inlines values instead of binding them.
pub fn inline_generator(kind: DialectKind) -> Box<dyn QueryGenerator> {
    init_tracing();
    query_generator(kind, DialectOptions::default().inline_values())
}
