use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::Order;

pub const CSV_HEADER: &str = "order_id,timestamp,symbol,side,price,quantity";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
}

/// Destination for a finished, time-ordered order sequence.
pub trait OrderSink {
    fn write_orders(&mut self, orders: &[Order]) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// `.json` means JSON, anything else CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(SinkError::UnknownFormat(other.to_string())),
        }
    }
}

pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OrderSink for CsvSink<W> {
    fn write_orders(&mut self, orders: &[Order]) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", CSV_HEADER)?;
        for o in orders {
            writeln!(
                self.writer,
                "{},{},{},{},{:.2},{}",
                o.order_id, o.timestamp, o.symbol, o.side, o.price, o.quantity
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the orders as one pretty-printed JSON array. Prices are emitted as
/// JSON numbers already rounded to cents, so `149.90` shows up as `149.9`.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OrderSink for JsonSink<W> {
    fn write_orders(&mut self, orders: &[Order]) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.writer, orders)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn boxed<W: Write + 'static>(writer: W, format: OutputFormat) -> Box<dyn OrderSink> {
    match format {
        OutputFormat::Csv => Box::new(CsvSink::new(writer)),
        OutputFormat::Json => Box::new(JsonSink::new(writer)),
    }
}

/// Opens a sink for `path`, creating missing parent directories. `-` is stdout.
pub fn open_sink(
    path: &Path,
    format: Option<OutputFormat>,
) -> Result<Box<dyn OrderSink>, SinkError> {
    if path == Path::new("-") {
        let format = format.unwrap_or(OutputFormat::Csv);
        return Ok(boxed(BufWriter::new(io::stdout()), format));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let format = format.unwrap_or_else(|| OutputFormat::from_path(path));
    let file = File::create(path)?;
    Ok(boxed(BufWriter::new(file), format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderSide;

    fn sample() -> Vec<Order> {
        vec![
            Order {
                order_id: 1,
                timestamp: 0,
                symbol: "AAPL".into(),
                side: OrderSide::Buy,
                price: 149.9,
                quantity: 12,
            },
            Order {
                order_id: 2,
                timestamp: 36_000,
                symbol: "MSFT".into(),
                side: OrderSide::Sell,
                price: 401.27,
                quantity: 3,
            },
        ]
    }

    #[test]
    fn test_csv_layout() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_orders(&sample()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,0,AAPL,BUY,149.90,12");
        assert_eq!(lines[2], "2,36000,MSFT,SELL,401.27,3");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_array() {
        let mut sink = JsonSink::new(Vec::new());
        sink.write_orders(&sample()).unwrap();
        let parsed: Vec<Order> = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(parsed, sample());

        let value: serde_json::Value = serde_json::to_value(&sample()[1]).unwrap();
        assert_eq!(value["side"], "SELL");
    }

    #[test]
    fn test_json_prices_have_at_most_two_decimals() {
        let mut orders = sample();
        orders.push(Order {
            order_id: 3,
            timestamp: 40_000,
            symbol: "GOOGL".into(),
            side: OrderSide::Buy,
            price: crate::domain::round_price(2801.23456),
            quantity: 1,
        });
        let mut sink = JsonSink::new(Vec::new());
        sink.write_orders(&orders).unwrap();
        let values: Vec<serde_json::Value> = serde_json::from_slice(&sink.into_inner()).unwrap();

        let rendered: Vec<String> = values.iter().map(|v| v["price"].to_string()).collect();
        assert_eq!(rendered, vec!["149.9", "401.27", "2801.23"]);
        for text in &rendered {
            let decimals = text.split('.').nth(1).map_or(0, str::len);
            assert!(decimals <= 2, "{} has {} decimals", text, decimals);
        }
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(OutputFormat::from_path(Path::new("out/a.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out/a.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("orders")), OutputFormat::Csv);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_open_sink_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("sim-orderflow-sink-{}", std::process::id()));
        let path = dir.join("nested").join("orders.csv");

        {
            let mut sink = open_sink(&path, None).unwrap();
            sink.write_orders(&sample()).unwrap();
        }
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(CSV_HEADER));

        fs::remove_dir_all(&dir).unwrap();
    }
}
