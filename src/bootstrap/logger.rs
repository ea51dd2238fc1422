use anstyle::{AnsiColor, Style};
use env_logger::{Builder, WriteStyle};
use log::kv::Key;
use std::io::Write;

const DIM: Style = AnsiColor::BrightBlack.on_default();
const DURATION: Style = AnsiColor::Cyan.on_default();
const DURATION_WIDTH: usize = 10;

/// Render the `duration` key-value attached to a record, e.g. `1.23 ms`.
fn format_duration(record: &log::Record<'_>) -> String {
    record
        .key_values()
        .get(Key::from("duration"))
        .map(|v| {
            let s = format!("{}", v);
            if let Some(idx) = s.find(|c: char| c.is_alphabetic()) {
                let (num, unit) = (&s[..idx], &s[idx..]);
                if let Ok(val) = num.parse::<f32>() {
                    return format!("{:.2} {}", val, unit);
                }
            }
            s
        })
        .unwrap_or_default()
}

/// Install the global logger. `RUST_LOG` overrides the default `info` level.
pub fn initialize_logger() {
    let mut builder = Builder::new();
    builder
        .write_style(WriteStyle::Auto)
        .format(|buf, record| {
            let ts = buf.timestamp();
            let level_style = buf.default_level_style(record.level());

            writeln!(
                buf,
                "{DIM}{ts}{DIM:#} {level_style}{}{level_style:#} {DIM}{}{DIM:#}",
                record.level(),
                record.target()
            )?;

            let dur_raw = format_duration(record);
            let dur = if dur_raw.is_empty() {
                " ".repeat(DURATION_WIDTH)
            } else {
                format!("{DURATION}{:>DURATION_WIDTH$}{DURATION:#}", dur_raw)
            };
            let subsequent_indent = " ".repeat(DURATION_WIDTH + 1);

            let message = format!("{}", record.args());
            let mut lines = message.lines();
            if let Some(first_line) = lines.next() {
                writeln!(buf, "{} {}", dur, first_line)?;
            }
            for line in lines {
                writeln!(buf, "{}{}", subsequent_indent, line)?;
            }
            Ok(())
        })
        .filter(None, log::LevelFilter::Info)
        .filter(Some("rocket"), log::LevelFilter::Warn)
        .parse_default_env();

    // A logger installed earlier (tests, embedding) wins.
    let _ = builder.try_init();
}
