use std::fs;

use assert_cmd::Command;
use indoc::indoc;
use mark_records::extract::extract_records;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const COHORT: &str = indoc! {"
    Cohort 4, summative marks
    Student:[ID:1,LastName:Smith,FirstName:John],Marks:[Challenges:[5,4,3,2,1,5,4,3],Exam:18,Capstone:90]
    Student:[ID:2,LastName:Doe,FirstName:Jane],Marks:[Challenges:[5,5,5,5,5,5,5,5],Exam:16,Capstone:84]
    not a student line
    Student:[ID:007,LastName:Bond,FirstName:James],Marks:[Challenges:[1,1,1,1,1,1],Exam:4,Capstone:10]
"};

const COHORT_REPORT: &str = indoc! {"
    91 - Jane Doe - (2)
    83 - John Smith - (1)
    16 - James Bond - (007)
"};

/// A leaderboard command running in its own empty directory, unaffected by the caller's env.
fn leaderboard(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("leaderboard").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("MARKS_DIR")
        .env_remove("OUTPUT_PATH")
        .env_remove("RUST_LOG");
    cmd
}

fn write_marks_dir(dir: &TempDir) {
    let marks = dir.path().join("marks");
    fs::create_dir_all(&marks).unwrap();
    fs::write(marks.join("a-cohort.mark"), COHORT).unwrap();
    fs::write(
        marks.join("b-single.mark"),
        "Student:[ID:1,LastName:Smith,FirstName:John],Marks:[Challenges:[5,4,3,2,1,5,4,3],Exam:18,Capstone:90]\n",
    )
    .unwrap();
    fs::write(marks.join("readme.txt"), "ignored").unwrap();
}

#[test]
fn grades_file_to_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cohort.mark");
    fs::write(&input, COHORT).unwrap();

    leaderboard(&dir)
        .arg(&input)
        .args(["--output", "-"])
        .assert()
        .success()
        .stdout(COHORT_REPORT);
}

#[test]
fn writes_default_output_file() {
    let dir = tempdir().unwrap();
    write_marks_dir(&dir);

    leaderboard(&dir).args(["--select", "1"]).assert().success();

    let report = fs::read_to_string(dir.path().join("output.txt")).unwrap();
    assert_eq!(report, COHORT_REPORT);
}

#[test]
fn selects_by_name_and_honors_env_config() {
    let dir = tempdir().unwrap();
    write_marks_dir(&dir);
    fs::rename(dir.path().join("marks"), dir.path().join("cohorts")).unwrap();

    leaderboard(&dir)
        .env("MARKS_DIR", "cohorts")
        .env("OUTPUT_PATH", "board.txt")
        .args(["--select", "b-single.mark"])
        .assert()
        .success();

    let report = fs::read_to_string(dir.path().join("board.txt")).unwrap();
    assert_eq!(report, "83 - John Smith - (1)\n");
}

#[test]
fn prompts_for_selection_on_stdin() {
    let dir = tempdir().unwrap();
    write_marks_dir(&dir);

    leaderboard(&dir)
        .args(["--output", "-"])
        .write_stdin("2\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("1. a-cohort.mark"))
        .stderr(predicate::str::contains("2. b-single.mark"))
        .stderr(predicate::str::contains("readme.txt").not())
        .stdout("83 - John Smith - (1)\n");
}

#[test]
fn invalid_selection_writes_empty_report() {
    let dir = tempdir().unwrap();
    write_marks_dir(&dir);

    leaderboard(&dir)
        .write_stdin("9\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid selection"));

    let report = fs::read_to_string(dir.path().join("output.txt")).unwrap();
    assert_eq!(report, "");
}

#[test]
fn text_without_students_gives_empty_report() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.mark");
    fs::write(&input, "no students this term\n").unwrap();

    leaderboard(&dir)
        .arg(&input)
        .args(["-o", "-"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn bad_challenge_score_fails_the_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.mark");
    fs::write(
        &input,
        "Student:[ID:5,LastName:Doe,FirstName:Jane],Marks:[Challenges:[5,x,3,2,1,5,4,3],Exam:18,Capstone:90]\n",
    )
    .unwrap();

    leaderboard(&dir)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not extract student records"))
        .stderr(predicate::str::contains("student 5"));

    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn missing_input_fails_the_run() {
    let dir = tempdir().unwrap();

    leaderboard(&dir)
        .arg("missing.mark")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read marks from"));
}

#[test]
fn csv_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cohort.mark");
    fs::write(&input, COHORT).unwrap();

    let expected = indoc! {"
        total,first_name,last_name,id
        91,Jane,Doe,2
        83,John,Smith,1
        16,James,Bond,007
    "};
    leaderboard(&dir)
        .arg(&input)
        .args(["--format", "csv", "--output", "-"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn show_prints_breakdown() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cohort.mark");
    fs::write(&input, COHORT).unwrap();

    leaderboard(&dir)
        .arg(&input)
        .args(["--show", "--output", "-"])
        .assert()
        .success()
        .stderr(predicate::str::contains("First Challenges Group: 5, 4, 3, 2, 1"))
        .stderr(predicate::str::contains("Total Percentage: 83"));
}

#[test]
fn repeated_runs_are_identical_and_line_per_block() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cohort.mark");
    fs::write(&input, COHORT).unwrap();

    let run = || {
        let output = leaderboard(&dir)
            .arg(&input)
            .args(["--output", "-"])
            .output()
            .unwrap();
        assert!(output.status.success());
        output.stdout
    };

    let first = run();
    assert_eq!(first, run());

    let text = String::from_utf8(first).unwrap();
    assert_eq!(text.lines().count(), extract_records(COHORT).unwrap().len());
}
