pub mod formatter;
pub mod writer;

pub use formatter::{
    format_detail, format_json, format_percent, format_registry, format_score,
    format_scored_table, format_tsv, should_use_colors, OutputFormat,
};
pub use writer::write_json_atomic;
