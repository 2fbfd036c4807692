use notion2anki::config::Config;
use notion2anki::error::ConvertError;
use notion2anki::fence::MONOSPACE_STYLE;
use notion2anki::pipeline::convert_file;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_export(dir: &TempDir, html: &str) -> PathBuf {
    let path = dir.path().join("export.html");
    fs::write(&path, html).unwrap();
    path
}

fn sample_export() -> String {
    r#"<html>
  <body>
    <table>
      <thead>
        <tr>
          <th>Notion-ID</th>
          <th>Front</th>
          <th>Back</th>
          <th>Tags</th>
        </tr>
      </thead>
      <tbody>
        <tr>
          <td>card-1</td>
          <td>What is OSPF?</td>
          <td><mark class="highlight-red">Link-state</mark> protocol</td>
          <td>OSPF LSA, ospf lsa, Routing</td>
        </tr>
        <tr>
          <td></td>
          <td>Row without an id</td>
          <td>dropped</td>
          <td></td>
        </tr>
        <tr>
          <td>card-2</td>
          <td>EIGRP variance?</td>
          <td>Set it with:<br/>```<br/>router eigrp 100<br/>variance 2<br/>```</td>
          <td>EIGRP</td>
        </tr>
      </tbody>
    </table>
  </body>
</html>"#
        .to_string()
}

#[test]
fn converts_sample_export_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write_export(&dir, &sample_export());
    let output = dir.path().join("out.csv");

    let report = convert_file(&input, &output, &Config::default()).unwrap();

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.converted, 2);
    assert_eq!(report.skipped, 1);
    assert!(report.errors[0].contains("empty Notion-ID"));

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "Notion-ID");
    assert_eq!(&headers[3], "Tags");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    assert_eq!(&rows[0][0], "card-1");
    assert_eq!(&rows[0][1], "What is OSPF?");
    assert_eq!(&rows[0][2], "<span style=\"color:red\">Link-state</span> protocol");
    assert_eq!(&rows[0][3], "OSPF-LSA Routing");

    assert_eq!(&rows[1][0], "card-2");
    assert_eq!(
        &rows[1][2],
        &format!(
            "Set it with:<br/><div style=\"{MONOSPACE_STYLE}\">router eigrp 100<br/>variance 2</div>"
        )
    );
    assert_eq!(&rows[1][3], "EIGRP");
}

#[test]
fn strict_mode_aborts_and_writes_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_export(&dir, &sample_export());
    let output = dir.path().join("out.csv");
    let config = Config {
        strict: true,
        ..Config::default()
    };

    let result = convert_file(&input, &output, &config);
    assert!(matches!(result, Err(ConvertError::RowDefect { .. })));
    assert!(!output.exists());
}

#[test]
fn header_suppression_is_respected() {
    let dir = TempDir::new().unwrap();
    let input = write_export(&dir, &sample_export());
    let output = dir.path().join("out.csv");
    let config = Config {
        include_header: false,
        ..Config::default()
    };

    convert_file(&input, &output, &config).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(!content.contains("Notion-ID"));
    assert!(content.starts_with("card-1,"));
}

#[test]
fn missing_input_file_is_fatal_and_produces_no_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("does-not-exist.html");
    let output = dir.path().join("out.csv");

    let result = convert_file(&input, &output, &Config::default());
    assert!(matches!(result, Err(ConvertError::Io(_))));
    assert!(!output.exists());
}

#[test]
fn export_without_table_reports_expected_vs_found() {
    let dir = TempDir::new().unwrap();
    let input = write_export(&dir, "<html><body><p>no table here</p></body></html>");
    let output = dir.path().join("out.csv");

    let err = convert_file(&input, &output, &Config::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("expected"));
    assert!(message.contains("table"));
    assert!(!output.exists());
}
