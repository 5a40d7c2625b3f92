use super::*;
use crate::expr::{Env, ExpressionError, Value};

fn rule(when: &str, globs: &[&str]) -> FeatureRule {
    FeatureRule {
        when: when.to_string(),
        globs: globs.iter().map(|s| s.to_string()).collect(),
    }
}

fn env(langs: &[&str]) -> Env {
    let mut env = Env::new();
    env.insert(
        "langs".to_string(),
        Value::List(langs.iter().map(|s| s.to_string()).collect()),
    );
    env.insert("go".to_string(), Value::Bool(langs.contains(&"Go")));
    env.insert("python".to_string(), Value::Bool(langs.contains(&"Python")));
    env
}

trait Included {
    fn included(&self) -> bool;
}

impl Included for Decision {
    fn included(&self) -> bool {
        matches!(self, Decision::Included(_))
    }
}

fn go_python_rules() -> Vec<FeatureRule> {
    vec![
        rule("go", &["**/go.mod", "**/*.go"]),
        rule("python", &["**/*.py", "requirements*.txt"]),
    ]
}

// =========================================================================
// Default include
// =========================================================================

#[test]
fn test_unmatched_path_is_included_by_default() {
    let set = FeatureSet::compile(&go_python_rules()).unwrap();
    let vars = env(&[]);

    let decision = set.decide("README.md", &Scope::new(&vars)).unwrap();

    assert_eq!(decision, Decision::Included(Inclusion::DefaultInclude));
}

#[test]
fn test_no_rules_includes_everything() {
    let set = FeatureSet::compile(&[]).unwrap();
    let vars = Env::new();
    assert!(set.is_empty());

    for path in ["a.go", "src/lib.rs", ".github/workflows/ci.yaml"] {
        assert!(set.decide(path, &Scope::new(&vars)).unwrap().included());
    }
}

// =========================================================================
// Exclusion and inclusion
// =========================================================================

#[test]
fn test_false_rule_excludes_matching_paths() {
    let set = FeatureSet::compile(&go_python_rules()).unwrap();
    let vars = env(&["Python"]);
    let scope = Scope::new(&vars);

    assert_eq!(
        set.decide("go.mod", &scope).unwrap(),
        Decision::Excluded { rules: vec![0] }
    );
    assert_eq!(
        set.decide("cmd/server/main.go", &scope).unwrap(),
        Decision::Excluded { rules: vec![0] }
    );
    assert_eq!(
        set.decide("app/main.py", &scope).unwrap(),
        Decision::Included(Inclusion::Rule(1))
    );
}

#[test]
fn test_true_rule_includes_matching_paths() {
    let set = FeatureSet::compile(&go_python_rules()).unwrap();
    let vars = env(&["Go"]);

    assert_eq!(
        set.decide("go.mod", &Scope::new(&vars)).unwrap(),
        Decision::Included(Inclusion::Rule(0))
    );
}

#[test]
fn test_any_true_matching_rule_includes() {
    let rules = vec![
        rule("go", &["BUILD.bazel"]),
        rule("python", &["BUILD.bazel"]),
    ];
    let set = FeatureSet::compile(&rules).unwrap();

    let only_python = env(&["Python"]);
    assert_eq!(
        set.decide("BUILD.bazel", &Scope::new(&only_python)).unwrap(),
        Decision::Included(Inclusion::Rule(1))
    );

    let neither = env(&[]);
    assert_eq!(
        set.decide("BUILD.bazel", &Scope::new(&neither)).unwrap(),
        Decision::Excluded { rules: vec![0, 1] }
    );
}

#[test]
fn test_rule_order_does_not_change_outcome() {
    let forward = go_python_rules();
    let mut reversed = forward.clone();
    reversed.reverse();
    let forward = FeatureSet::compile(&forward).unwrap();
    let reversed = FeatureSet::compile(&reversed).unwrap();

    for langs in [&[][..], &["Go"][..], &["Python"][..], &["Go", "Python"][..]] {
        let vars = env(langs);
        let scope = Scope::new(&vars);
        for path in ["go.mod", "main.go", "app.py", "requirements.txt", "README.md"] {
            assert_eq!(
                forward.decide(path, &scope).unwrap().included(),
                reversed.decide(path, &scope).unwrap().included(),
                "{} with {:?}",
                path,
                langs
            );
        }
    }
}

#[test]
fn test_expression_conditions() {
    let rules = vec![rule(r#""Rust" in langs and not go"#, &["Cargo.toml"])];
    let set = FeatureSet::compile(&rules).unwrap();

    let rust = env(&["Rust"]);
    assert!(set.decide("Cargo.toml", &Scope::new(&rust)).unwrap().included());

    let both = env(&["Rust", "Go"]);
    assert!(!set.decide("Cargo.toml", &Scope::new(&both)).unwrap().included());
}

#[test]
fn test_backslash_paths_normalized() {
    let set = FeatureSet::compile(&go_python_rules()).unwrap();
    let vars = env(&[]);

    assert!(
        !set.decide("cmd\\main.go", &Scope::new(&vars))
            .unwrap()
            .included()
    );
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn test_every_matching_rule_is_evaluated() {
    // The first rule is true, the second references an undefined name. The
    // error must surface rather than being skipped.
    let rules = vec![rule("true", &["*.txt"]), rule("undefined_flag", &["*.txt"])];
    let set = FeatureSet::compile(&rules).unwrap();
    let vars = Env::new();

    let err = set.decide("notes.txt", &Scope::new(&vars)).unwrap_err();
    match err {
        ScaffoldError::Expression { context, source } => {
            assert_eq!(context, "features[1] (file 'notes.txt')");
            assert_eq!(
                source,
                ExpressionError::Undefined("undefined_flag".to_string())
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_non_matching_rule_is_not_evaluated() {
    let rules = vec![rule("undefined_flag", &["*.go"])];
    let set = FeatureSet::compile(&rules).unwrap();
    let vars = Env::new();

    assert!(set.decide("README.md", &Scope::new(&vars)).unwrap().included());
}

#[test]
fn test_compile_rejects_bad_glob() {
    let err = FeatureSet::compile(&[rule("true", &["src/[oops"])]).unwrap_err();
    assert!(matches!(err, ScaffoldError::ConfigValidation { ref name, .. } if name == "features[0]"));
}
