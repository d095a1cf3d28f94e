use assert_cmd::Command;
use std::process::Output;
use std::str;

/// Generic execution function that invokes hostlit with colour disabled
/// so that output is comparable.
fn exec_hostlit(input: &str, args: &[&str]) -> Output {
    let mut test_args = vec!["--color", "never"];
    test_args.extend_from_slice(args);

    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("hostlit").unwrap();
    cmd.env_remove("HOSTLIT_TEMPLATE")
        .args(&test_args)
        .write_stdin(input)
        .output()
        .expect("failed to execute")
}

/// Run hostlit and return its stdout as a String.
fn run_hostlit(input: &str, args: &[&str]) -> String {
    let output = exec_hostlit(input, args);
    assert!(
        output.status.success(),
        "hostlit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    str::from_utf8(&output.stdout)
        .expect("Failed to read stdout as UTF-8")
        .to_string()
}

/// Legacy literal in a known scheme is decorated in place
#[test]
fn inline_legacy_host() {
    let input = "GET http://0x7f.1/admin HTTP/1.1\n";
    let expected = "GET http://<0x7f.1|127.0.0.1|legacy|loopback,ambiguous>/admin HTTP/1.1\n";
    assert_eq!(run_hostlit(input, &[]), expected);
}

/// DNS names and lines without URLs pass through untouched
#[test]
fn non_numeric_hosts_unchanged() {
    let input = r#"
see https://example.com/x for details
no urls on this line 10.0.0.1
"#
    .trim_start_matches('\n');
    assert_eq!(run_hostlit(input, &[]), input);
}

/// Multiple hosts on one line, only matching output
#[test]
fn only_matching() {
    let input = "a http://10.0.0.1:80/ b ftp://3232235777/ c https://example.org\n";
    let expected = r#"
<10.0.0.1|10.0.0.1|legacy|>
<3232235777|192.168.1.1|legacy|ambiguous>
"#
    .trim_start_matches('\n');
    assert_eq!(run_hostlit(input, &["-o"]), expected);
}

/// Unknown schemes are read with the canonical dialect only
#[test]
fn unknown_scheme_is_strict() {
    let input = "redis://0177.0.0.1:6379\nredis://10.1.1.1:6379\n";
    let expected = r#"
<0177.0.0.1||canonical|ambiguous>
<10.1.1.1|10.1.1.1|canonical|>
"#
    .trim_start_matches('\n');
    assert_eq!(run_hostlit(input, &["-o"]), expected);
}

/// --scheme promotes a scheme to the legacy dialect
#[test]
fn extra_known_scheme() {
    let input = "redis://0177.0.0.1:6379\n";
    let expected = "<0177.0.0.1|127.0.0.1|legacy|loopback,ambiguous>\n";
    assert_eq!(run_hostlit(input, &["-o", "--scheme", "redis"]), expected);
}

/// Embedded IPv4 in a bracketed IPv6 host
#[test]
fn ipv6_tail() {
    let input = "http://[::ffff:10.0.0.1]/ http://[::ffff:010.0.0.1]/\n";
    let expected = "http://[::ffff:<10.0.0.1|10.0.0.1|canonical|>]/ http://[::ffff:010.0.0.1]/\n";
    assert_eq!(run_hostlit(input, &[]), expected);
}

/// Userinfo is not mistaken for the host
#[test]
fn userinfo_skipped() {
    let input = "ftp://1.2.3.4:pw@5.6.7.8/pub\n";
    let expected = "ftp://1.2.3.4:pw@<5.6.7.8|5.6.7.8|legacy|>/pub\n";
    assert_eq!(run_hostlit(input, &[]), expected);
}

/// Bare mode treats each line as a host
#[test]
fn bare_only_matching() {
    let input = r#"
127.1
8.8.8.8
example.com

0xffffffff
"#
    .trim_start_matches('\n');
    let expected = r#"
<127.1|127.0.0.1|legacy|loopback,ambiguous>
<8.8.8.8|8.8.8.8|legacy|>
<0xffffffff|255.255.255.255|legacy|ambiguous>
"#
    .trim_start_matches('\n');
    assert_eq!(run_hostlit(input, &["--bare", "-o"]), expected);
}

/// Bare mode keeps surrounding whitespace when decorating inline
#[test]
fn bare_inline() {
    let input = "  127.1:8080\nexample.com\n";
    let expected = "  <127.1|127.0.0.1|legacy|loopback,ambiguous>:8080\nexample.com\n";
    assert_eq!(run_hostlit(input, &["--bare"]), expected);
}

/// Context flags for bare hosts
#[test]
fn bare_context_flags() {
    let input = "0x7f.1\n";
    assert_eq!(
        run_hostlit(input, &["--bare", "-o", "--unknown-scheme"]),
        "<0x7f.1||canonical|ambiguous>\n"
    );

    let input = "1.2.3.4:80\n";
    assert_eq!(
        run_hostlit(input, &["--bare", "-o"]),
        "<1.2.3.4|1.2.3.4|legacy|>\n"
    );
    // In an implicit file path `:` does not end the host
    assert_eq!(run_hostlit(input, &["--bare", "-o", "--implicit-file"]), "");

    let input = "1.2.3.4%eth0\n";
    assert_eq!(
        run_hostlit(input, &["--bare", "-o", "--ipv6-context"]),
        "<1.2.3.4|1.2.3.4|canonical|>\n"
    );
}

/// Context flags only make sense for bare hosts
#[test]
fn context_flags_require_bare() {
    let output = exec_hostlit("", &["--ipv6-context"]);
    assert!(!output.status.success());
}

/// Only ambiguous hosts are reported
#[test]
fn ambiguous_only() {
    let input = "http://10.0.0.1/ http://010.0.0.1/ http://127.0.0.1/\n";
    let expected = "<010.0.0.1|8.0.0.1|legacy|ambiguous>\n";
    assert_eq!(run_hostlit(input, &["-o", "--ambiguous-only"]), expected);
}

/// Custom template
#[test]
fn custom_template() {
    let input = "http://0x7f.1/ https://192.168.1.1/\n";
    let expected = r#"
0x7f.1=127.0.0.1 legacy:127.0.0.1 canonical:
192.168.1.1=192.168.1.1 legacy:192.168.1.1 canonical:192.168.1.1
"#
    .trim_start_matches('\n');
    let args = [
        "-o",
        "--template",
        "{host}={ip} legacy:{legacy} canonical:{canonical}",
    ];
    assert_eq!(run_hostlit(input, &args), expected);
}

/// Template taken from the environment
#[test]
fn template_from_env() {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("hostlit").unwrap();
    let output = cmd
        .env("HOSTLIT_TEMPLATE", "[{scheme}:{ip}]")
        .args(["--color", "never", "-o"])
        .write_stdin("wss://127.0.0.1:443/\n")
        .output()
        .expect("failed to execute");
    assert_eq!(str::from_utf8(&output.stdout).unwrap(), "[wss:127.0.0.1]\n");
}

/// Unknown template fields are rejected up front
#[test]
fn unknown_template_field() {
    let output = exec_hostlit("http://1.2.3.4/\n", &["-t", "{asnorg}"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown template field: {asnorg}"), "{}", stderr);
}

/// JSON output, one object per host
#[test]
fn json_output() {
    let input = "http://0177.0.0.1/ http://example.com/\n";
    let output = run_hostlit(input, &["--json"]);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 1);

    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["host"], "0177.0.0.1");
    assert_eq!(value["scheme"], "http");
    assert_eq!(value["range"]["start"], 7);
    assert_eq!(value["range"]["end"], 17);
    assert_eq!(value["dialect"], "legacy");
    assert_eq!(value["address"]["address"], 2130706433u32);
    assert_eq!(value["address"]["loopback"], true);
    assert_eq!(value["legacy"], "127.0.0.1");
    assert_eq!(value["canonical"], serde_json::Value::Null);
    assert_eq!(value["ambiguous"], true);
    assert_eq!(value["context"]["not_implicit_file"], true);
}

/// --json does not combine with decoration options
#[test]
fn json_conflicts_with_only_matching() {
    let output = exec_hostlit("", &["--json", "-o"]);
    assert!(!output.status.success());
}

/// Template field listing
#[test]
fn list_templates() {
    let output = run_hostlit("", &["-L"]);
    for field in ["{host}", "{ip}", "{dialect}", "{scheme}", "{legacy}", "{canonical}", "{notes}"] {
        assert!(output.contains(field), "missing {} in {}", field, output);
    }
}

/// Missing input file is reported with its path
#[test]
fn missing_input_file() {
    let output = exec_hostlit("", &["/nonexistent/hostlit-test-input.log"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to open file: /nonexistent/hostlit-test-input.log"),
        "{}",
        stderr
    );
}
