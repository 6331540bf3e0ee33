//! Line-protocol metric writer.
//!
//! Sends metrics to a Vantage proxy over a plain TCP connection in the
//! text line protocol: `name value [timestamp] source=X tag=value...`.
//! The connection stays open until the writer is dropped or
//! [`MetricWriter::shutdown`] is called.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{Result, VantageError};

/// A single metric observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Full metric name, e.g. `some.cool.count`.
    pub name: String,

    /// Numerical value of the metric.
    pub value: f64,

    /// Decimal places kept when formatting the value. Defaults to 0.
    pub precision: usize,

    /// Unix epoch seconds at which the metric was measured. When 0 the
    /// proxy stamps the point at receive time.
    pub timestamp: i64,
}

impl Metric {
    /// Returns a metric with the given name and value, proxy-stamped
    /// and with zero precision.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Metric {
            name: name.into(),
            value,
            precision: 0,
            timestamp: 0,
        }
    }

    /// Replaces the value, keeping name, precision and timestamp.
    pub fn update(&mut self, value: f64) -> &mut Self {
        self.value = value;
        self
    }
}

/// A metric point tag, a plain key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointTag {
    pub key: String,
    pub value: String,
}

impl PointTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        PointTag {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Writes metrics to a Vantage proxy.
///
/// Every metric written carries the writer's source and point tags.
/// Generic over the sink so tests can write into a buffer.
#[derive(Debug)]
pub struct MetricWriter<W = TcpStream> {
    sink: W,
    source: String,
    point_tags: Vec<PointTag>,
    // Cached "source=X k=v\n" tail shared by every line.
    suffix: String,
}

impl MetricWriter<TcpStream> {
    /// Connects to the proxy at `address:port` and returns a writer
    /// stamping metrics with `source` and `tags`.
    pub async fn connect(
        address: &str,
        port: u16,
        source: &str,
        tags: Vec<PointTag>,
    ) -> Result<Self> {
        let stream = TcpStream::connect((address, port)).await?;
        Self::from_sink(stream, source, tags)
    }
}

impl<W: AsyncWrite + Unpin> MetricWriter<W> {
    /// Wraps an already-open sink. `source` must be non-empty.
    pub fn from_sink(sink: W, source: &str, tags: Vec<PointTag>) -> Result<Self> {
        if source.is_empty() {
            return Err(VantageError::InvalidInput("source is required".to_string()));
        }
        let suffix = metric_suffix(source, &tags);
        Ok(MetricWriter {
            sink,
            source: source.to_string(),
            point_tags: tags,
            suffix,
        })
    }

    /// Replaces the point tags on subsequent writes.
    pub fn set_point_tags(&mut self, tags: Vec<PointTag>) {
        self.suffix = metric_suffix(&self.source, &tags);
        self.point_tags = tags;
    }

    /// Replaces the source on subsequent writes.
    pub fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
        self.suffix = metric_suffix(&self.source, &self.point_tags);
    }

    /// Writes one metric line to the proxy.
    pub async fn write(&mut self, metric: &Metric) -> Result<()> {
        let mut line = format!(
            "{} {:.precision$}",
            metric.name,
            metric.value,
            precision = metric.precision
        );
        if metric.timestamp != 0 {
            line.push_str(&format!(" {}", metric.timestamp));
        }
        line.push(' ');
        line.push_str(&self.suffix);
        self.sink.write_all(line.as_bytes()).await?;
        Ok(())
    }

    /// Flushes and closes the connection.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.sink.shutdown().await?;
        Ok(())
    }
}

fn metric_suffix(source: &str, tags: &[PointTag]) -> String {
    let mut suffix = format!("source={source}");
    for tag in tags {
        suffix.push_str(&format!(" {}={}", tag.key, tag.value));
    }
    suffix.push('\n');
    suffix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(buf: &mut Vec<u8>, tags: Vec<PointTag>) -> MetricWriter<&mut Vec<u8>> {
        MetricWriter::from_sink(buf, "test.host", tags).unwrap()
    }

    #[tokio::test]
    async fn plain_metric_line() {
        let mut buf = Vec::new();
        let mut w = writer(&mut buf, Vec::new());
        w.write(&Metric::new("requests.count", 42.0)).await.unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "requests.count 42 source=test.host\n"
        );
    }

    #[tokio::test]
    async fn precision_and_timestamp() {
        let mut buf = Vec::new();
        let mut w = writer(&mut buf, Vec::new());
        w.write(&Metric {
            name: "cpu.load".to_string(),
            value: 0.256,
            precision: 2,
            timestamp: 1_533_529_040,
        })
        .await
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "cpu.load 0.26 1533529040 source=test.host\n"
        );
    }

    #[tokio::test]
    async fn point_tags_appended_in_order() {
        let mut buf = Vec::new();
        let tags = vec![
            PointTag::new("env", "prod"),
            PointTag::new("dc", "us-east-1"),
        ];
        let mut w = writer(&mut buf, tags);
        w.write(&Metric::new("requests.count", 1.0)).await.unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "requests.count 1 source=test.host env=prod dc=us-east-1\n"
        );
    }

    #[tokio::test]
    async fn suffix_tracks_source_and_tag_changes() {
        let mut buf = Vec::new();
        let mut w = writer(&mut buf, Vec::new());
        w.set_source("other.host");
        w.set_point_tags(vec![PointTag::new("env", "stage")]);
        w.write(&Metric::new("x", 1.0)).await.unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "x 1 source=other.host env=stage\n"
        );
    }

    #[test]
    fn empty_source_rejected() {
        let err = MetricWriter::from_sink(Vec::new(), "", Vec::new()).unwrap_err();
        assert!(matches!(err, VantageError::InvalidInput(_)));
    }

    #[test]
    fn update_replaces_value_only() {
        let mut metric = Metric::new("x", 1.0);
        metric.update(2.5);
        assert_eq!(metric.value, 2.5);
        assert_eq!(metric.name, "x");
        assert_eq!(metric.precision, 0);
    }
}
