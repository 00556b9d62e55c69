use chrono::{DateTime, Local, TimeZone, Utc};
use hdls::core::{ListOptions, Listing, PathArgument, RenderOptions};
use hdls::error::Error;
use hdls::remote::MemoryFs;
use rand::Rng;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const HOME: &str = "/user/alice";

fn now() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Local::now)
}

fn list_with(
    fs: &MemoryFs,
    args: &[&str],
    options: ListOptions,
    batch_size: usize,
) -> Result<String, Error> {
    let mut out = Vec::new();
    let args = args.iter().copied().map(PathArgument::absolute).collect();
    Listing::new(fs, HOME, options)
        .with_batch_size(batch_size)
        .run(args, &mut out, now())?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn list(fs: &MemoryFs, args: &[&str], options: ListOptions) -> Result<String, Error> {
    list_with(fs, args, options, hdls::core::BATCH_SIZE)
}

fn opts(long: bool, all: bool, human: bool, json: bool) -> ListOptions {
    ListOptions {
        all,
        render: RenderOptions {
            long,
            human_readable: human,
            json,
        },
    }
}

fn big_dir(n: usize) -> MemoryFs {
    let mut fs = MemoryFs::new();
    for i in 0..n {
        if i % 7 == 0 {
            fs.add_file(&format!("/big/.hidden-{:03}", i), i as u64);
        } else if i % 5 == 0 {
            fs.add_dir(&format!("/big/dir-{:03}", i));
        } else {
            fs.add_file(&format!("/big/file-{:03}", i), (i * 1000) as u64);
        }
    }
    fs
}

#[test]
fn test_home_listing_hides_dotfiles() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_file("/user/alice/a.txt", 3);
    fs.add_file("/user/alice/.hidden", 3);
    assert_eq!(list(&fs, &[], ListOptions::default())?, "a.txt\n");
    Ok(())
}

#[test]
fn test_show_all_long_on_empty_dir() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_dir("/empty");
    let out = list(&fs, &["/empty"], opts(true, true, false, false))?;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected output: {:?}", out);
    assert!(lines[0].starts_with("drwxr-xr-x") && lines[0].ends_with(" ."));
    assert!(lines[1].starts_with("drwxr-xr-x") && lines[1].ends_with(" .."));
    // ".." is the root, owned by hdfs.
    assert!(lines[1].contains("hdfs"));
    Ok(())
}

#[test]
fn test_two_directories_get_headers_and_one_blank_line() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_file("/x/a", 1);
    fs.add_file("/y/b", 2);
    let out = list(&fs, &["/x", "/y"], opts(true, false, false, false))?;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5, "unexpected output: {:?}", out);
    assert_eq!(lines[0], "/x/:");
    assert!(lines[1].ends_with(" a"));
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "/y/:");
    assert!(lines[4].ends_with(" b"));
    assert_eq!(out.matches("\n\n").count(), 1);
    Ok(())
}

#[test]
fn test_single_directory_has_no_header() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_file("/x/a", 1);
    assert_eq!(list(&fs, &["/x"], ListOptions::default())?, "a\n");
    Ok(())
}

#[test]
fn test_files_come_before_directories() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_file("/d/inner", 1);
    fs.add_file("/f1", 1);
    fs.add_file("/f2", 1);
    let out = list(&fs, &["/d", "/f1", "/f2"], ListOptions::default())?;
    assert_eq!(out, "/f1\n/f2\n/d/:\ninner\n");
    Ok(())
}

#[test]
fn test_missing_path_fails_without_output() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_file("/x/a", 1);
    let mut out = Vec::new();
    let args = vec![PathArgument::absolute("/x"), PathArgument::absolute("/missing")];
    let res = Listing::new(&fs, HOME, opts(false, false, false, true)).run(args, &mut out, now());
    let err = res.err().ok_or("expected an error")?;
    assert_eq!(err.to_string(), "stat /missing: file does not exist");
    assert!(out.is_empty(), "unexpected output: {:?}", out);
    Ok(())
}

#[test]
fn test_pagination_is_transparent() -> TestResult {
    let fs = big_dir(250);
    for options in [
        opts(false, false, false, false),
        opts(true, true, true, false),
        opts(true, false, false, true),
    ] {
        let reference = list_with(&fs, &["/big"], options, 100)?;
        assert_eq!(list_with(&fs, &["/big"], options, 1)?, reference);
        assert_eq!(list_with(&fs, &["/big"], options, 250)?, reference);
    }
    Ok(())
}

#[test]
fn test_pagination_random_batch_sizes() -> TestResult {
    let fs = big_dir(250);
    let options = opts(true, false, true, false);
    let reference = list_with(&fs, &["/big"], options, 100)?;
    let mut rng = rand::rng();
    for _ in 0..20 {
        let batch = rng.random_range(1..=300);
        assert_eq!(
            list_with(&fs, &["/big"], options, batch)?,
            reference,
            "batch size {} changed the output",
            batch
        );
    }
    Ok(())
}

#[test]
fn test_hidden_entries_across_server_pages() -> TestResult {
    let mut fs = MemoryFs::new().with_page_size(2);
    for name in [".a", "b", ".c", ".d", "e", "f", ".g"] {
        fs.add_file(&format!("/p/{}", name), 1);
    }
    for batch in [1, 2, 3, 100] {
        assert_eq!(
            list_with(&fs, &["/p"], ListOptions::default(), batch)?,
            "b\ne\nf\n"
        );
        assert_eq!(
            list_with(&fs, &["/p"], opts(false, true, false, false), batch)?,
            ".\n..\n.a\nb\n.c\n.d\ne\nf\n.g\n"
        );
    }
    Ok(())
}

#[test]
fn test_json_spans_directories() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_file("/top.txt", 5);
    fs.add_file("/x/a", 1);
    fs.add_file("/x/.b", 1);
    fs.add_file("/y/c", 2);
    let out = list(&fs, &["/x", "/top.txt", "/y"], opts(false, false, false, true))?;
    assert!(out.starts_with("[\n    { \"name\": "), "unexpected output: {:?}", out);
    assert!(out.ends_with("\n]\n"));

    let value: serde_json::Value = serde_json::from_str(&out)?;
    let names: Vec<&str> = value
        .as_array()
        .ok_or("not an array")?
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, ["/top.txt", "/x/a", "/y/c"]);
    Ok(())
}

#[test]
fn test_json_long_fields_and_no_synthetic_entries() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.set_modified(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).single().ok_or("bad date")?);
    fs.add_file("/d/data.bin", 1536);
    let out = list(&fs, &["/d"], opts(true, true, true, true))?;

    let value: serde_json::Value = serde_json::from_str(&out)?;
    let items = value.as_array().ok_or("not an array")?;
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item["mode"], "-rw-r--r--");
    assert_eq!(item["owner"], "alice");
    assert_eq!(item["group"], "staff");
    assert_eq!(item["size"], 1536);
    assert_eq!(item["name"], "/d/data.bin");
    let mod_time = item["modTime"].as_str().ok_or("no modTime")?;
    assert_eq!(DateTime::parse_from_rfc3339(mod_time)?.timestamp(), 1_577_934_245);
    Ok(())
}

#[test]
fn test_empty_json_listing_is_an_empty_array() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_dir("/empty");
    let out = list(&fs, &["/empty"], opts(false, false, false, true))?;
    assert_eq!(out, "[\n]\n");
    let value: serde_json::Value = serde_json::from_str(&out)?;
    assert_eq!(value.as_array().map(Vec::len), Some(0));
    Ok(())
}

#[test]
fn test_json_array_closed_after_midway_failure() -> TestResult {
    let mut fs = MemoryFs::new();
    for i in 0..5 {
        fs.add_file(&format!("/d/f{}", i), 1);
    }
    fs.fail_listing_after("/d", 1);

    let mut out = Vec::new();
    let res = Listing::new(&fs, HOME, opts(false, false, false, true))
        .with_batch_size(2)
        .run(vec![PathArgument::absolute("/d")], &mut out, now());
    assert!(matches!(res, Err(Error::Io(_))));

    let text = String::from_utf8(out)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn test_long_rows_written_before_failure_are_flushed() -> TestResult {
    let mut fs = MemoryFs::new();
    for i in 0..4 {
        fs.add_file(&format!("/d/f{}", i), 1);
    }
    fs.fail_listing_after("/d", 1);

    let mut out = Vec::new();
    let res = Listing::new(&fs, HOME, opts(true, false, false, false))
        .with_batch_size(3)
        .run(vec![PathArgument::absolute("/d")], &mut out, now());
    assert!(res.is_err());
    assert_eq!(String::from_utf8(out)?.lines().count(), 3);
    Ok(())
}

#[test]
fn test_human_readable_sizes_in_long_rows() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_file("/s/zero", 0);
    fs.add_file("/s/kib", 1536);
    fs.add_file("/s/mib", 1_048_576);
    let out = list(&fs, &["/s"], opts(true, false, true, false))?;
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].contains(" 0B "), "{:?}", lines[0]);
    assert!(lines[1].contains(" 1.5K "), "{:?}", lines[1]);
    assert!(lines[2].contains(" 1.0M "), "{:?}", lines[2]);
    Ok(())
}

#[test]
fn test_directories_are_read_in_batches() -> TestResult {
    let fs = big_dir(250);
    list_with(&fs, &["/big"], ListOptions::default(), 100)?;
    // One probe, then three reads for 250 entries.
    assert_eq!(fs.stat_calls(), 1);
    assert_eq!(fs.read_calls(), 3);
    Ok(())
}

#[test]
fn test_long_file_block_and_directory_blocks_align_separately() -> TestResult {
    let mut fs = MemoryFs::new();
    fs.add_file("/a.txt", 5);
    fs.add_file("/big.bin", 123_456);
    fs.add_file("/x/inner", 1);
    fs.add_file("/y/other", 22);
    let out = list(&fs, &["/x", "/a.txt", "/y", "/big.bin"], opts(true, false, false, false))?;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 7, "unexpected output: {:?}", out);

    // Files first, then /x with no blank line before its header.
    assert!(lines[0].ends_with(" /a.txt") && lines[1].ends_with(" /big.bin"));
    assert_eq!(lines[2], "/x/:");
    assert!(lines[3].ends_with(" inner"));
    assert_eq!(lines[4], "");
    assert_eq!(lines[5], "/y/:");
    assert!(lines[6].ends_with(" other"));

    // The file block is padded to the widest size in it; directory blocks are not.
    assert!(lines[0].contains(" staff       5 "), "{:?}", lines[0]);
    assert!(lines[1].contains(" staff  123456 "), "{:?}", lines[1]);
    assert!(lines[3].contains(" staff  1 "), "{:?}", lines[3]);
    assert!(lines[6].contains(" staff  22 "), "{:?}", lines[6]);
    assert_eq!(lines[0].find("Mar"), lines[1].find("Mar"));
    assert_ne!(lines[0].find("Mar"), lines[3].find("Mar"));
    Ok(())
}

#[test]
fn test_current_year_rows_show_time_and_older_rows_show_year() -> TestResult {
    let recent = Utc.with_ymd_and_hms(2026, 3, 4, 12, 30, 0).single().ok_or("bad date")?;
    let old = Utc.with_ymd_and_hms(2019, 7, 1, 12, 0, 0).single().ok_or("bad date")?;

    let mut fs = MemoryFs::new();
    fs.set_modified(recent);
    fs.add_file("/t/recent", 1);
    fs.set_modified(old);
    fs.add_file("/t/old", 1);
    let out = list(&fs, &["/t"], opts(true, false, false, false))?;
    let lines: Vec<&str> = out.lines().collect();

    let time = recent.with_timezone(&Local).format("%H:%M").to_string();
    assert!(lines[0].ends_with(&format!(" {} recent", time)), "{:?}", lines[0]);
    assert!(lines[1].ends_with("  2019 old"), "{:?}", lines[1]);
    Ok(())
}
