// src/services/crawler.rs

//! Request pipeline: validate, map, send, parse.
//!
//! Mistakes in the query or the crawler's own settings come back as `Err`
//! before anything is sent. Once the request is on its way every outcome,
//! good or bad, is an [`Envelope`].

use std::fmt;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{
    CalendarQuery, Config, Endpoint, EndpointConfig, EnrollmentQuery, Envelope, FetchEnvelope,
    KeyMap, Payload, Query, RecordsEnvelope, STATUS_OK, STATUS_PARSE_FAILED, WireParams,
};
use crate::services::parser::{CalendarParser, EnrollmentParser, TableParser};
use crate::services::transport::{HttpTransport, Method, Transport};
use crate::utils::check_host;

/// Crawler for one endpoint.
#[derive(Clone)]
pub struct Crawler<Q, P> {
    host: String,
    key_map: KeyMap,
    method: Method,
    defaults: Q,
    query: Q,
    parser: P,
    transport: Arc<dyn Transport>,
}

pub type CalendarCrawler = Crawler<CalendarQuery, CalendarParser>;
pub type EnrollmentCrawler = Crawler<EnrollmentQuery, EnrollmentParser>;

impl CalendarCrawler {
    /// Timetable crawler over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config.http)?);
        Self::new(&config.calendar, CalendarParser, transport)
    }
}

impl EnrollmentCrawler {
    /// Enrollment crawler over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config.http)?);
        Self::new(&config.enrollment, EnrollmentParser, transport)
    }
}

impl<Q: Endpoint, P: TableParser> Crawler<Q, P> {
    /// Build a crawler from endpoint settings.
    ///
    /// The configured defaults become the stored query.
    pub fn new(config: &EndpointConfig<Q>, parser: P, transport: Arc<dyn Transport>) -> Result<Self> {
        let host = check_host(&config.host)?.to_string();
        let defaults = config.defaults.validated()?;
        let mut crawler = Self {
            host,
            key_map: KeyMap::new(),
            method: config.method,
            query: defaults.clone(),
            defaults,
            parser,
            transport,
        };
        crawler.set_key_map(config.key_map.clone())?;
        Ok(crawler)
    }
}

impl<Q: Query, P: TableParser> Crawler<Q, P> {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: impl Into<String>) -> Result<()> {
        let host = host.into();
        check_host(&host)?;
        self.host = host;
        Ok(())
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Replace the whole key map.
    pub fn set_key_map(&mut self, key_map: KeyMap) -> Result<()> {
        if let Some(wire) = key_map.collisions().first() {
            return Err(AppError::config(format!(
                "key map sends more than one field as '{wire}'"
            )));
        }
        self.key_map = key_map;
        Ok(())
    }

    /// Query used when a call does not bring its own.
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Merge with the defaults, validate and store.
    pub fn set_query(&mut self, query: Q) -> Result<()> {
        self.query = query.merged_with(&self.defaults).validated()?;
        Ok(())
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Wire parameters for `query` merged with the defaults.
    pub fn wire_params(&self, query: &Q) -> Result<WireParams> {
        let validated = query.merged_with(&self.defaults).validated()?;
        self.key_map.translate(validated.fields())
    }

    /// Send the query (or the stored one) and return the raw response.
    pub async fn fetch(&self, query: Option<&Q>) -> Result<FetchEnvelope> {
        let params = self.wire_params(query.unwrap_or(&self.query))?;
        Ok(self.transport.send(&self.host, self.method, &params).await)
    }

    /// Fetch and parse.
    ///
    /// A transport failure is reported as a parse failure carrying the
    /// transport's message.
    pub async fn get_records(&self, query: Option<&Q>) -> Result<RecordsEnvelope<P::Record>> {
        let fetched = self.fetch(query).await?;
        let envelope = parse_response(fetched, |text| self.parser.parse(text));
        match envelope.data.as_data() {
            Some(table) => log::info!("{}: {} records", self.host, table.length),
            None => log::warn!("{}: {}", self.host, envelope.message),
        }
        Ok(envelope)
    }
}

/// Turn a transport envelope into a parse-layer envelope.
///
/// Anything but a `200` from the transport becomes a `400` with the
/// transport's message; otherwise `parse` decides.
pub fn parse_response<T, E: fmt::Display>(
    fetched: FetchEnvelope,
    parse: impl FnOnce(&str) -> std::result::Result<T, E>,
) -> Envelope<Payload<T>> {
    if !fetched.is_success() {
        return Envelope::new(STATUS_PARSE_FAILED, Payload::Empty, fetched.message);
    }
    match parse(&fetched.data) {
        Ok(data) => Envelope::new(STATUS_OK, Payload::Data(data), "success"),
        Err(e) => Envelope::new(STATUS_PARSE_FAILED, Payload::Empty, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use wiremock::matchers::{body_string, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::{ParseError, ValidationError};
    use crate::models::HttpConfig;
    use crate::services::parser::fixtures::{good_cells, page, row};

    /// Answers every request with the same body and counts the calls.
    struct StubTransport {
        body: String,
        calls: AtomicUsize,
    }

    impl StubTransport {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, _host: &str, _method: Method, _params: &WireParams) -> FetchEnvelope {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Envelope::new(STATUS_OK, self.body.clone(), "OK")
        }
    }

    fn http() -> Arc<HttpTransport> {
        Arc::new(HttpTransport::new(&HttpConfig::default()).unwrap())
    }

    fn calendar_at(host: String) -> CalendarCrawler {
        let config = EndpointConfig {
            host,
            ..EndpointConfig::default()
        };
        CalendarCrawler::new(&config, CalendarParser, http()).unwrap()
    }

    fn enrollment_at(host: String) -> EnrollmentCrawler {
        let config = EndpointConfig {
            host,
            ..EndpointConfig::default()
        };
        EnrollmentCrawler::new(&config, EnrollmentParser, http()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_host() {
        let config = EndpointConfig::<CalendarQuery> {
            host: "chau len bar".to_string(),
            ..EndpointConfig::default()
        };
        let err = Crawler::new(&config, CalendarParser, http()).err().unwrap();
        assert_eq!(err.to_string(), "'chau len bar' is not a valid host.");
    }

    #[test]
    fn test_new_stores_defaults_as_query() {
        let crawler = EnrollmentCrawler::from_config(&Config::default()).unwrap();
        assert_eq!(crawler.query().page, Some(1));
        assert_eq!(crawler.method(), Method::Get);
        assert_eq!(crawler.host(), "http://112.137.129.87/qldt/");
    }

    #[test]
    fn test_set_host_keeps_old_host_on_error() {
        let mut crawler = CalendarCrawler::from_config(&Config::default()).unwrap();
        assert!(crawler.set_host("localhost:5000").is_err());
        assert_eq!(crawler.host(), "http://112.137.129.115/tkb/listbylist.php");

        crawler.set_host("http://localhost:5000/calendar").unwrap();
        assert_eq!(crawler.host(), "http://localhost:5000/calendar");
    }

    #[test]
    fn test_set_key_map_replaces_whole_map() {
        let mut crawler = CalendarCrawler::from_config(&Config::default()).unwrap();
        crawler
            .set_key_map([("semesterID", "a"), ("day", "c")].into_iter().collect())
            .unwrap();
        assert_eq!(crawler.key_map().len(), 2);

        let params = crawler.wire_params(&CalendarQuery::new().day("CN")).unwrap();
        assert_eq!(
            params.to_pairs(),
            vec![
                ("a".to_string(), "78".to_string()),
                ("c".to_string(), "CN".to_string())
            ]
        );

        let err = crawler
            .set_key_map([("day", "x"), ("subjectID", "x")].into_iter().collect())
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(crawler.key_map().len(), 2);
    }

    #[test]
    fn test_set_query_validates_and_merges_defaults() {
        let mut crawler = CalendarCrawler::from_config(&Config::default()).unwrap();
        crawler.set_query(CalendarQuery::new().subject("1234")).unwrap();
        assert_eq!(crawler.query().semester_id.as_deref(), Some("78"));
        assert_eq!(crawler.query().subject_id.as_deref(), Some("1234"));

        let err = crawler.set_query(CalendarQuery::new().day("8")).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::Choice { field: "day", .. })
        ));
        assert_eq!(crawler.query().subject_id.as_deref(), Some("1234"));
    }

    #[tokio::test]
    async fn test_unmapped_field_fails_before_sending() {
        let transport = StubTransport::new("");
        let crawler =
            CalendarCrawler::new(&EndpointConfig::default(), CalendarParser, transport.clone()).unwrap();

        let err = crawler
            .get_records(Some(&CalendarQuery::new().with_field("is_fail", 2)))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::UnmappedKey { ref key } if key == "is_fail"));
        assert_eq!(err.to_string(), "'is_fail' is not in key map.");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reserved_field_rejected_even_when_mapped() {
        let transport = StubTransport::new("");
        let mut crawler =
            CalendarCrawler::new(&EndpointConfig::default(), CalendarParser, transport.clone()).unwrap();
        let mut key_map = KeyMap::calendar();
        key_map.insert("host", "host");
        crawler.set_key_map(key_map).unwrap();

        let err = crawler
            .get_records(Some(&CalendarQuery::new().with_field("host", "http://evil.example")))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::ReservedKey { ref key } if key == "host"));
        assert_eq!(crawler.host(), "http://112.137.129.115/tkb/listbylist.php");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_field_fails_before_sending() {
        let transport = StubTransport::new("");
        let crawler =
            CalendarCrawler::new(&EndpointConfig::default(), CalendarParser, transport.clone()).unwrap();

        let err = crawler
            .fetch(Some(&CalendarQuery::new().semester("0367")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "'0367' is not a valid semester ID format. Eg. 78");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_records_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendar"))
            .and(body_string("slt_namhoc=78&slt_thu_filter=CN"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(&[row(&good_cells())])))
            .mount(&server)
            .await;

        let crawler = calendar_at(format!("{}/calendar", server.uri()));
        let envelope = crawler
            .get_records(Some(&CalendarQuery::new().day("CN")))
            .await
            .unwrap();

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.message, "success");
        let json = serde_json::to_value(&envelope).unwrap();
        let table = envelope.data.into_data().unwrap();
        assert_eq!(table.length, 1);
        assert_eq!(table.data[0].course_subject_id, "INT2204");
        assert_eq!(table.data[0].lessons, [1, 3]);

        assert_eq!(json["data"]["length"], 1);
        assert_eq!(json["data"]["data"][0]["courseSubjectClassID"], "INT2204 1");
    }

    #[tokio::test]
    async fn test_get_records_uses_stored_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("slt_namhoc=78&slt_mamonhoc_filter=1234"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(&[])))
            .expect(1)
            .mount(&server)
            .await;

        let mut crawler = calendar_at(server.uri());
        crawler.set_query(CalendarQuery::new().subject("1234")).unwrap();
        let envelope = crawler.get_records(None).await.unwrap();

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.data.as_data().unwrap().length, 0);
    }

    #[tokio::test]
    async fn test_get_records_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(&[row(&good_cells())])))
            .mount(&server)
            .await;

        let crawler = calendar_at(server.uri());
        let query = CalendarQuery::new().subject_class("2204");
        let first = crawler.get_records(Some(&query)).await.unwrap();
        let second = crawler.get_records(Some(&query)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_remote_error_becomes_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Throw an error intentionally"))
            .mount(&server)
            .await;

        let envelope = calendar_at(server.uri()).get_records(None).await.unwrap();

        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.data, Payload::Empty);
        assert_eq!(envelope.message, "Internal Server Error");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap()["data"],
            serde_json::json!({})
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_becomes_parse_failure() {
        let envelope = calendar_at("http://127.0.0.1:1".to_string())
            .get_records(None)
            .await
            .unwrap();

        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.data, Payload::Empty);
        assert!(!envelope.message.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_table_rejects_whole_batch() {
        let mut bad = good_cells();
        bad[9] = "4-3";
        let transport = StubTransport::new(&page(&[row(&good_cells()), row(&bad)]));
        let crawler = CalendarCrawler::new(&EndpointConfig::default(), CalendarParser, transport).unwrap();

        let envelope = crawler.get_records(None).await.unwrap();

        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.data, Payload::Empty);
        assert_eq!(envelope.message, "First lesson can not be greater than the last.");
    }

    #[tokio::test]
    async fn test_enrollment_sends_get_and_reports_missing_parser() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/qldt/"))
            .and(query_param("pageSize", "1000"))
            .and(query_param("SinhvienLmh[masvTitle]", "21020366"))
            .and(query_param("SinhvienLmh_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<table></table>"))
            .expect(1)
            .mount(&server)
            .await;

        let crawler = enrollment_at(format!("{}/qldt/", server.uri()));
        let envelope = crawler
            .get_records(Some(&EnrollmentQuery::new().student("21020366")))
            .await
            .unwrap();

        assert_eq!(envelope.status, 400);
        assert_eq!(
            envelope.message,
            ParseError::NotImplemented { table: "enrollment" }.to_string()
        );
    }

    #[tokio::test]
    async fn test_get_values_with_reserved_characters_arrive_intact() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("SinhvienLmh[ghichu]", "lop #2"))
            .and(query_param("SinhvienLmh[hotenTitle]", "A&B=C"))
            .and(query_param("SinhvienLmh_page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<table></table>"))
            .expect(1)
            .mount(&server)
            .await;

        let config = EndpointConfig {
            host: format!("{}/qldt/", server.uri()),
            ..EndpointConfig::default()
        };
        let transport = Arc::new(HttpTransport::with_client(reqwest::Client::new()));
        let crawler = EnrollmentCrawler::new(&config, EnrollmentParser, transport).unwrap();

        let query = EnrollmentQuery {
            student_name: Some("A&B=C".to_string()),
            subject_note: Some("lop #2".to_string()),
            page: Some(3),
            ..EnrollmentQuery::default()
        };
        let fetched = crawler.fetch(Some(&query)).await.unwrap();
        assert_eq!(fetched.status, 200);
    }

    #[test]
    fn test_parse_response_conventions() {
        let ok: Envelope<Payload<usize>> =
            parse_response(Envelope::new(200, "abc".to_string(), "OK"), |text| {
                Ok::<_, ParseError>(text.len())
            });
        assert_eq!(ok, Envelope::new(200, Payload::Data(3), "success"));

        let failed: Envelope<Payload<usize>> =
            parse_response(Envelope::new(500, String::new(), "connect error"), |_| {
                Ok::<_, ParseError>(0)
            });
        assert_eq!(failed, Envelope::new(400, Payload::Empty, "connect error"));

        let rejected: Envelope<Payload<usize>> =
            parse_response(Envelope::new(200, "x".to_string(), "OK"), |_| Err("bad row"));
        assert_eq!(rejected, Envelope::new(400, Payload::Empty, "bad row"));
    }
}
