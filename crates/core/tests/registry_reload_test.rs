use std::fs;
use std::sync::Arc;

use jenxt_core::fingerprint;
use jenxt_core::registry::{ScriptLoader, ScriptRegistry};
use tempfile::TempDir;

fn script(expose: &str, json_response: bool, body: &str) -> String {
    format!(
        "/*\n<jenxt>\n{{\n  \"expose\": \"{expose}\",\n  \"authentication\": \"none\",\n  \"params\": [{{\"name\": \"job\", \"regex\": \"^[a-z]+$\"}}],\n  \"jsonResponse\": {json_response}\n}}\n</jenxt>\n*/\n{body}\n"
    )
}

fn write(dir: &TempDir, file: &str, content: &str) {
    fs::write(dir.path().join(file), content).unwrap();
}

fn load(dir: &TempDir) -> (ScriptLoader, ScriptRegistry) {
    let loader = ScriptLoader::new(dir.path());
    let registry = loader.load().unwrap();
    (loader, registry)
}

#[test]
fn test_load_well_formed_scripts() {
    let dir = TempDir::new().unwrap();
    write(&dir, "build.groovy", &script("build", false, "println 'OK'"));
    write(&dir, "nodes.groovy", &script("nodes", true, "println '{}'"));

    let (_, registry) = load(&dir);

    assert_eq!(registry.len(), 2);
    let build = registry.resolve("/build").unwrap();
    assert_eq!(build.exposed_path, "build");
    assert_eq!(build.authentication_mode, "none");
    assert_eq!(build.expected_parameters.len(), 1);
    assert_eq!(build.expected_parameters[0].name, "job");
    assert!(!build.json_response);
    assert_eq!(build.source_file, "build.groovy");
    assert!(build.script_body.contains("println 'OK'"));
    assert!(registry.resolve("/nodes").unwrap().json_response);
}

#[test]
fn test_load_skips_files_without_meta() {
    let dir = TempDir::new().unwrap();
    write(&dir, "good.groovy", &script("good", false, "println 1"));
    write(&dir, "plain.groovy", "println 'no metadata'");
    write(&dir, "broken.groovy", "<jenxt>{ \"expose\": </jenxt>");
    fs::create_dir(dir.path().join("subdir")).unwrap();

    let (_, registry) = load(&dir);

    assert_eq!(registry.len(), 1);
    assert!(registry.get("plain.groovy").is_none());
    assert!(registry.get("broken.groovy").is_none());
    assert!(registry.resolve("/good").is_some());
}

#[test]
fn test_reload_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.groovy", &script("a", false, "println 'a'"));
    write(&dir, "b.groovy", &script("b", false, "println 'b'"));

    let (loader, registry) = load(&dir);
    let first = loader.reload(&registry).unwrap();
    let second = loader.reload(&first.registry).unwrap();

    assert_eq!(second.summary.unchanged, 2);
    assert_eq!(second.summary.reloaded, 0);
    assert!(!second.summary.has_changes());

    for (file, descriptor) in registry.iter() {
        let reloaded = second.registry.get(file).unwrap();
        assert!(Arc::ptr_eq(descriptor, reloaded));
        assert_eq!(descriptor.content_fingerprint, reloaded.content_fingerprint);
    }
}

#[test]
fn test_reload_detects_changed_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.groovy", &script("a", false, "println 'a'"));
    write(&dir, "b.groovy", &script("b", false, "println 'b'"));

    let (loader, registry) = load(&dir);
    let updated = script("a", true, "println 'changed'");
    write(&dir, "a.groovy", &updated);

    let outcome = loader.reload(&registry).unwrap();

    assert_eq!(outcome.summary.reloaded, 1);
    assert_eq!(outcome.summary.unchanged, 1);

    let a = outcome.registry.get("a.groovy").unwrap();
    assert_eq!(a.content_fingerprint, fingerprint(updated.as_bytes()));
    assert_ne!(
        a.content_fingerprint,
        registry.get("a.groovy").unwrap().content_fingerprint
    );
    assert!(a.json_response);

    let b_before = registry.get("b.groovy").unwrap();
    let b_after = outcome.registry.get("b.groovy").unwrap();
    assert!(Arc::ptr_eq(b_before, b_after));

    // 旧快照保持不变
    assert!(!registry.get("a.groovy").unwrap().json_response);
}

#[test]
fn test_reload_adds_and_removes_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.groovy", &script("a", false, "println 'a'"));
    write(&dir, "b.groovy", &script("b", false, "println 'b'"));

    let (loader, registry) = load(&dir);
    fs::remove_file(dir.path().join("b.groovy")).unwrap();
    write(&dir, "c.groovy", &script("c", false, "println 'c'"));

    let outcome = loader.reload(&registry).unwrap();

    assert_eq!(outcome.summary.added, 1);
    assert_eq!(outcome.summary.removed, 1);
    assert!(outcome.registry.resolve("/b").is_none());
    assert!(outcome.registry.resolve("/c").is_some());
    assert!(registry.resolve("/b").is_some());
}

#[test]
fn test_reload_keeps_previous_when_change_is_malformed() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.groovy", &script("a", false, "println 'a'"));

    let (loader, registry) = load(&dir);
    write(&dir, "a.groovy", "println 'metadata removed'");

    let outcome = loader.reload(&registry).unwrap();
    assert_eq!(outcome.summary.rejected, 1);
    assert_eq!(outcome.summary.reloaded, 0);
    let kept = outcome.registry.get("a.groovy").unwrap();
    assert!(Arc::ptr_eq(kept, registry.get("a.groovy").unwrap()));

    // 同样的无效内容不再重复解析
    let again = loader.reload(&outcome.registry).unwrap();
    assert_eq!(again.summary.rejected, 1);
    assert!(again.registry.resolve("/a").is_some());

    // 修复后重新加载
    write(&dir, "a.groovy", &script("a", true, "println 'fixed'"));
    let fixed = loader.reload(&again.registry).unwrap();
    assert_eq!(fixed.summary.reloaded, 1);
    assert!(fixed.registry.resolve("/a").unwrap().json_response);
}

#[test]
fn test_reload_picks_up_fixed_new_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "late.groovy", "println 'not yet'");

    let (loader, registry) = load(&dir);
    assert!(registry.is_empty());

    let outcome = loader.reload(&registry).unwrap();
    assert_eq!(outcome.summary.rejected, 1);
    assert!(outcome.registry.is_empty());

    write(&dir, "late.groovy", &script("late", false, "println 'now'"));
    let outcome = loader.reload(&outcome.registry).unwrap();
    assert_eq!(outcome.summary.added, 1);
    assert!(outcome.registry.resolve("/late").is_some());
}

#[test]
fn test_duplicate_expose_is_deterministic() {
    let dir = TempDir::new().unwrap();
    write(&dir, "b.groovy", &script("build", false, "println 'b'"));
    write(&dir, "a.groovy", &script("build", false, "println 'a'"));

    let (_, registry) = load(&dir);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.route_count(), 1);
    assert_eq!(registry.resolve("/build").unwrap().source_file, "b.groovy");
    assert_eq!(registry.duplicates()[0].shadowed, "a.groovy");
}
