use guardon::{Rule, validate::validate_documents};
use proptest::prelude::*;
use serde_json::{Value, json};

/// A list of containers, each optionally carrying a `resources` key.
fn arb_containers() -> impl Strategy<Value = (Value, Vec<bool>)> {
    prop::collection::vec(any::<bool>(), 0..8).prop_map(|flags| {
        let items: Vec<Value> = flags
            .iter()
            .enumerate()
            .map(|(i, has_resources)| {
                if *has_resources {
                    json!({ "name": format!("c{}", i), "resources": {} })
                } else {
                    json!({ "name": format!("c{}", i) })
                }
            })
            .collect();
        (json!({ "kind": "Pod", "spec": { "containers": items } }), flags)
    })
}

fn required(id: &str, path: &str) -> Rule {
    Rule {
        required: true,
        ..Rule::new(id, path)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn wildcard_fan_out_reports_each_missing_element((doc, flags) in arb_containers()) {
        let rules = vec![required("res", "spec.containers[*].resources")];
        let results = validate_documents(&[doc], &rules);

        let expected: Vec<String> = flags
            .iter()
            .enumerate()
            .filter(|(_, has)| !**has)
            .map(|(i, _)| format!("spec.containers[{}].resources", i))
            .collect();
        let actual: Vec<String> = results.into_iter().filter_map(|r| r.path).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn disabled_rules_never_fire((doc, _) in arb_containers(), pattern in "[a-z0-9]{0,3}") {
        let mut rule = required("off", "spec.containers[*].resources");
        rule.pattern = Some(pattern);
        rule.enabled = false;
        prop_assert!(validate_documents(&[doc], &[rule]).is_empty());
    }

    #[test]
    fn kind_filter_never_fires_on_other_kinds((doc, _) in arb_containers(), kind in "[A-Z][a-z]{2,8}") {
        prop_assume!(!kind.eq_ignore_ascii_case("pod"));
        let mut doc = doc;
        doc["kind"] = json!(kind);
        let rule = Rule {
            kind: Some("Pod".to_string()),
            ..required("k", "spec.containers[*].resources")
        };
        prop_assert!(validate_documents(&[doc], &[rule]).is_empty());
    }

    #[test]
    fn missing_parent_suppresses_required((doc, _) in arb_containers()) {
        let rule = required("sc", "spec.securityContext.runAsNonRoot");
        prop_assert!(validate_documents(&[doc], &[rule]).is_empty());
    }
}
