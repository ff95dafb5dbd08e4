use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use fixcopyright::boilerplate::Boilerplate;
use fixcopyright::config::Policy;
use fixcopyright::engine::Engine;
use fixcopyright::file_types::{FileCategory, FileTypeTable};
use fixcopyright::history::{FixedHistory, LastModified, NoHistory};
use fixcopyright::processor::{Processor, ProcessorConfig, RunContext};
use fixcopyright::report::FileOutcome;
use fixcopyright::rewrite::{Action, ActionKind};
use fixcopyright::scanner::SourceFile;
use fixcopyright::warnings::WarningKind;
use tempfile::tempdir;

const CURRENT_YEAR: i32 = 2025;

fn header(category: FileCategory, years: &str) -> String {
  Boilerplate::default().render(&category.format(), years, &[], "\n")
}

fn engine(policy: Policy) -> Engine {
  Engine::new(policy, Boilerplate::default(), CURRENT_YEAR)
}

fn processor(root: &Path, policy: Policy, history: FixedHistory) -> Processor {
  Processor::new(ProcessorConfig {
    engine: engine(policy),
    file_types: FileTypeTable::new(),
    history: Arc::new(history),
    workspace_root: root.to_path_buf(),
    check_only: false,
    diff_manager: None,
  })
}

#[test]
fn test_new_java_file_gets_header_at_top() {
  let file = SourceFile::new("Foo.java", "public class Foo {}\n".to_string(), FileCategory::Source);
  let history = FixedHistory::new().with("Foo.java", LastModified::Year(2024));

  let decision = engine(Policy::defaults(CURRENT_YEAR)).plan(&file, &history);

  match &decision.action {
    Action::Insert { offset, text } => {
      assert_eq!(*offset, 0);
      assert!(text.starts_with("/****"));
      assert!(text.contains(" * Copyright (c) 2024 IBM Corporation and others."));
    }
    other => panic!("expected insert, got {:?}", other),
  }
  assert!(decision.warnings.is_empty());
  assert_eq!(decision.year, Some(2024));
}

#[test]
fn test_uncommented_files_always_insert() {
  let cases = [
    ("A.java", FileCategory::Source, "class A {}\n"),
    ("a.c", FileCategory::Source, "/* just a note */\nint x;\n"),
    ("build.sh", FileCategory::ShellMake, "#!/bin/sh\necho hi\n"),
    ("run.bat", FileCategory::Batch, "@echo off\r\n"),
    ("app.properties", FileCategory::Properties, "key=value\n"),
  ];

  for (name, category, text) in cases {
    let file = SourceFile::new(name, text.to_string(), category);
    let decision = engine(Policy::defaults(CURRENT_YEAR)).plan(&file, &NoHistory);
    assert_eq!(decision.action.kind(), ActionKind::Insert, "{}", name);
  }
}

#[test]
fn test_range_extended_to_last_modified_year() {
  let text = format!("{}\nclass A {{}}\n", header(FileCategory::Source, "2000, 2007"));
  let file = SourceFile::new("A.java", text, FileCategory::Source);
  let history = FixedHistory::new().with("A.java", LastModified::Year(2020));

  let decision = engine(Policy::defaults(CURRENT_YEAR)).plan(&file, &history);

  assert_eq!(decision.action.kind(), ActionKind::Replace);
  let updated = decision.action.apply(file.text());
  assert!(updated.contains(" * Copyright (c) 2000, 2020 IBM Corporation and others."));
  assert!(updated.ends_with("\nclass A {}\n"));
}

#[test]
fn test_header_already_covering_year_is_noop() {
  let text = format!("{}\nclass A {{}}\n", header(FileCategory::Source, "2015"));
  let file = SourceFile::new("A.java", text, FileCategory::Source);
  let history = FixedHistory::new().with("A.java", LastModified::Year(2015));

  let decision = engine(Policy::defaults(CURRENT_YEAR)).plan(&file, &history);
  assert_eq!(decision.action, Action::NoOp);
  assert!(decision.warnings.is_empty());
}

#[test]
fn test_multiple_copyrights_never_touched() {
  let text = format!(
    "{}\n/* Copyright (c) 1998 Another Company */\nclass A {{}}\n",
    header(FileCategory::Source, "2001")
  );
  let file = SourceFile::new("A.java", text, FileCategory::Source);
  let history = FixedHistory::new().with("A.java", LastModified::Year(2024));

  for replace_all in [false, true] {
    let mut policy = Policy::defaults(CURRENT_YEAR);
    policy.replace_all = replace_all;
    let decision = engine(policy).plan(&file, &history);
    assert_eq!(decision.action, Action::NoOp);
    assert_eq!(decision.warnings, vec![WarningKind::MultipleCopyrights]);
  }
}

#[test]
fn test_mid_line_second_copyright_aborts() {
  let text = format!(
    "{}\nint x; /* Copyright (c) 1999 Other Corp */\n",
    header(FileCategory::Source, "2001")
  );
  let file = SourceFile::new("a.c", text, FileCategory::Source);
  let history = FixedHistory::new().with("a.c", LastModified::Year(2024));

  assert_eq!(file.count_copyright_comments(), 2);
  let decision = engine(Policy::defaults(CURRENT_YEAR)).plan(&file, &history);
  assert_eq!(decision.action, Action::NoOp);
  assert_eq!(decision.warnings, vec![WarningKind::MultipleCopyrights]);
}

#[test]
fn test_properties_comment_after_header_stays_in_place() {
  const TAIL: &str = "\n# Plugin display name\npluginName=Foo\n";
  let text = format!("{}{TAIL}", header(FileCategory::Properties, "2001, 2010"));
  let file = SourceFile::new("plugin.properties", text, FileCategory::Properties);
  let history = FixedHistory::new().with("plugin.properties", LastModified::Year(2020));

  let decision = engine(Policy::defaults(CURRENT_YEAR)).plan(&file, &history);

  assert_eq!(decision.action.kind(), ActionKind::Replace);
  assert!(decision.warnings.is_empty());
  assert_eq!(
    decision.action.apply(file.text()),
    format!("{}{TAIL}", header(FileCategory::Properties, "2001, 2020"))
  );
}

#[test]
fn test_batch_comment_after_header_stays_in_place() {
  const TAIL: &str = "\nrem Build the docs\n@echo off\n";
  let text = format!("{}{TAIL}", header(FileCategory::Batch, "2005"));
  let file = SourceFile::new("build.bat", text, FileCategory::Batch);
  let history = FixedHistory::new().with("build.bat", LastModified::Year(2020));

  let decision = engine(Policy::defaults(CURRENT_YEAR)).plan(&file, &history);

  assert_eq!(decision.action.kind(), ActionKind::Replace);
  assert_eq!(
    decision.action.apply(file.text()),
    format!("{}{TAIL}", header(FileCategory::Batch, "2005, 2020"))
  );
}

#[test]
fn test_insert_then_update_keeps_following_comment() {
  const ORIGINAL: &str = "# Plugin display name\npluginName=Foo\n";
  let engine = engine(Policy::defaults(CURRENT_YEAR));

  let file = SourceFile::new("plugin.properties", ORIGINAL.to_string(), FileCategory::Properties);
  let history = FixedHistory::new().with("plugin.properties", LastModified::Year(2020));
  let decision = engine.plan(&file, &history);
  assert_eq!(decision.action.kind(), ActionKind::Insert);
  let inserted = decision.action.apply(file.text());
  assert_eq!(
    inserted,
    format!("{}\n{ORIGINAL}", header(FileCategory::Properties, "2020"))
  );

  let file = SourceFile::new("plugin.properties", inserted, FileCategory::Properties);
  let history = FixedHistory::new().with("plugin.properties", LastModified::Year(2021));
  let decision = engine.plan(&file, &history);
  assert_eq!(decision.action.kind(), ActionKind::Replace);
  assert_eq!(
    decision.action.apply(file.text()),
    format!("{}\n{ORIGINAL}", header(FileCategory::Properties, "2020, 2021"))
  );
}

#[test]
fn test_inserted_year_parses_back() {
  let file = SourceFile::new("Foo.java", "class Foo {}\n".to_string(), FileCategory::Source);
  let history = FixedHistory::new().with("Foo.java", LastModified::Year(2019));
  let engine = engine(Policy::defaults(CURRENT_YEAR));

  let decision = engine.plan(&file, &history);
  let rewritten = SourceFile::new("Foo.java", decision.action.apply(file.text()), FileCategory::Source);
  let comment = rewritten.first_copyright_comment();
  let parsed = fixcopyright::copyright::parse(
    comment.as_ref(),
    FileCategory::Source,
    engine.boilerplate(),
    CURRENT_YEAR,
  )
  .expect("header parses");

  assert_eq!(parsed.revision_year(), Some(2019));
  assert_eq!(engine.plan(&rewritten, &history).action, Action::NoOp);
}

#[test]
fn test_ignored_properties_file_untouched() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  let original = format!("{}\nkey=value\n", header(FileCategory::Properties, "2001, 2010"));
  fs::write(root.join("Bar.properties"), &original)?;

  let mut policy = Policy::defaults(CURRENT_YEAR);
  policy.ignore_properties_files = true;
  let history = FixedHistory::new().with(root.join("Bar.properties"), LastModified::Year(2010));
  let context = RunContext::default();
  let outcome = processor(root, policy, history).run(vec![root.join("Bar.properties")], &context);

  assert_eq!(outcome.reports[0].outcome, FileOutcome::Skipped);
  assert_eq!(fs::read_to_string(root.join("Bar.properties"))?, original);
  assert!(context.warnings.is_empty());
  Ok(())
}

#[test]
fn test_gpl_header_keeps_body_and_warns() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  let original = "/*
 * Copyright (c) 2001, 2019 IBM Corporation and others.
 * This file is distributed under the GPL, see COPYING.
 */
int main(void) { return 0; }
";
  fs::write(root.join("baz.c"), original)?;

  let history = FixedHistory::new().with(root.join("baz.c"), LastModified::Year(2023));
  let context = RunContext::default();
  let outcome = processor(root, Policy::defaults(CURRENT_YEAR), history).run(vec![root.join("baz.c")], &context);

  assert_eq!(outcome.reports[0].outcome, FileOutcome::Replaced);
  assert_eq!(
    fs::read_to_string(root.join("baz.c"))?,
    original.replace("2001, 2019", "2001, 2023")
  );
  assert_eq!(
    context.warnings.render(),
    "Old copyright contains GPL, MPL, or Apple. Copyright unchanged. Date updated if necessary.\n     baz.c\n"
  );
  Ok(())
}

#[test]
fn test_warning_log_groups_files_in_visit_order() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  let double = format!(
    "{}\n/* Copyright (c) 1998 Another Company */\n",
    header(FileCategory::Source, "2001")
  );
  fs::write(root.join("B.java"), &double)?;
  fs::write(root.join("A.java"), &double)?;
  fs::write(root.join("Makefile"), "all:\n")?;

  let context = RunContext::default();
  processor(root, Policy::defaults(CURRENT_YEAR), FixedHistory::new()).run(
    vec![root.join("B.java"), root.join("Makefile"), root.join("A.java")],
    &context,
  );

  let entries = context.warnings.entries();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0].0, WarningKind::MultipleCopyrights);
  assert_eq!(entries[0].1, vec![Path::new("B.java"), Path::new("A.java")]);
  assert_eq!(entries[1].0, WarningKind::NoExtension);
  assert_eq!(fs::read_to_string(root.join("A.java"))?, double);
  Ok(())
}
