//! Response synthesis: merging completion text with backend payloads.
//!
//! Pure function of its inputs. Ids and timestamps are assigned by the
//! pipeline when it finalizes the response, so identical inputs always
//! produce identical output here.

use crate::domain::orchestration::DirectiveResolution;
use crate::domain::service::{ServiceCallResult, ServiceKind};

/// Synthesized reply content plus the metadata derived alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub content: String,
    pub services_referenced: Vec<ServiceKind>,
    pub services_consulted: Vec<ServiceKind>,
    pub backend_data_included: bool,
}

/// Combine completion text, an optional directive resolution, and dispatched
/// service payloads into the final user-facing content and metadata.
///
/// Precedence:
/// 1. a successfully resolved directive renders its narrative prefix plus
///    that service's payload, overriding the completion text;
/// 2. otherwise dispatched successes are appended to the completion text as
///    labeled blocks (failures stay out of the visible text but are still
///    reflected in the referenced/consulted sets);
/// 3. otherwise the completion text passes through verbatim.
#[must_use]
pub fn synthesize(
    completion_text: &str,
    directive_resolution: Option<&DirectiveResolution>,
    dispatch_results: &[ServiceCallResult],
    classified: &[ServiceKind],
    query: &str,
) -> Synthesis {
    let resolved_directive =
        directive_resolution.and_then(|res| res.result.payload().map(|p| (res, p)));

    let content = if let Some((resolution, payload)) = resolved_directive {
        let rendered = render_payload(resolution.result.service, payload);
        let prefix = resolution.directive.narrative_prefix.trim();
        if prefix.is_empty() {
            rendered
        } else {
            format!("{prefix}\n\n{rendered}")
        }
    } else if !dispatch_results.is_empty() {
        let mut content = completion_text.to_string();
        for result in dispatch_results {
            if let Some(payload) = result.payload() {
                if !content.is_empty() {
                    content.push_str("\n\n");
                }
                content.push_str(&render_payload(result.service, payload));
            }
        }
        content
    } else {
        completion_text.to_string()
    };

    let mut services_consulted: Vec<ServiceKind> = Vec::new();
    for result in dispatch_results {
        if result.is_success() {
            push_unique(&mut services_consulted, result.service);
        }
    }
    if let Some((resolution, _)) = resolved_directive {
        push_unique(&mut services_consulted, resolution.result.service);
    }

    let mut services_referenced: Vec<ServiceKind> = Vec::new();
    for &kind in classified {
        push_unique(&mut services_referenced, kind);
    }
    let mention_haystack = format!("{} {}", query.to_lowercase(), content.to_lowercase());
    for kind in ServiceKind::ALL {
        if mention_haystack.contains(kind.as_str()) {
            push_unique(&mut services_referenced, kind);
        }
    }

    let backend_data_included = !services_consulted.is_empty();

    Synthesis {
        content,
        services_referenced,
        services_consulted,
        backend_data_included,
    }
}

/// Render one service payload as a labeled block.
fn render_payload(service: ServiceKind, payload: &serde_json::Value) -> String {
    let body =
        serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    format!("[{}]\n{}", service.display_name(), body)
}

fn push_unique(set: &mut Vec<ServiceKind>, kind: ServiceKind) {
    if !set.contains(&kind) {
        set.push(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::domain::orchestration::Directive;
    use crate::domain::service::ServiceCallOutcome;

    fn success(service: ServiceKind, payload: serde_json::Value) -> ServiceCallResult {
        ServiceCallResult {
            service,
            outcome: ServiceCallOutcome::Success(payload),
        }
    }

    fn resolution(service: ServiceKind, outcome: ServiceCallOutcome) -> DirectiveResolution {
        DirectiveResolution {
            directive: Directive {
                service,
                query: "lookup".into(),
                narrative_prefix: "Here is what I found:".into(),
            },
            result: ServiceCallResult { service, outcome },
        }
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let results = vec![success(ServiceKind::Compliance, json!({"permits": 3}))];
        let classified = vec![ServiceKind::Compliance];

        let first = synthesize("Narrative.", None, &results, &classified, "permits?");
        let second = synthesize("Narrative.", None, &results, &classified, "permits?");
        assert_eq!(first, second);
    }

    #[test]
    fn resolved_directive_takes_precedence_over_completion_text() {
        let res = resolution(
            ServiceKind::Schedule,
            ServiceCallOutcome::Success(json!({"milestone": "M2"})),
        );

        let synthesis = synthesize("raw model text", Some(&res), &[], &[], "when is M2?");

        assert!(synthesis.content.starts_with("Here is what I found:"));
        assert!(synthesis.content.contains("Schedule Analysis"));
        assert!(synthesis.content.contains("M2"));
        assert!(!synthesis.content.contains("raw model text"));
        assert_eq!(synthesis.services_consulted, vec![ServiceKind::Schedule]);
        assert!(synthesis.backend_data_included);
    }

    #[test]
    fn failed_directive_falls_back_to_completion_text() {
        let res = resolution(ServiceKind::Schedule, ServiceCallOutcome::Timeout);

        let synthesis = synthesize("Sorry, one moment.", Some(&res), &[], &[], "when?");

        assert_eq!(synthesis.content, "Sorry, one moment.");
        assert!(synthesis.services_consulted.is_empty());
        assert!(!synthesis.backend_data_included);
    }

    #[test]
    fn successful_results_are_appended_and_failures_omitted_from_text() {
        let results = vec![
            success(ServiceKind::Compliance, json!({"permits": ["demolition"]})),
            ServiceCallResult {
                service: ServiceKind::Schedule,
                outcome: ServiceCallOutcome::Timeout,
            },
        ];
        let classified = vec![ServiceKind::Compliance, ServiceKind::Schedule];

        let synthesis = synthesize(
            "Summary of your position.",
            None,
            &results,
            &classified,
            "permits and schedule?",
        );

        assert!(synthesis.content.starts_with("Summary of your position."));
        assert!(synthesis.content.contains("Compliance Analysis"));
        assert!(synthesis.content.contains("demolition"));
        assert!(!synthesis.content.contains("Schedule Analysis"));
        // Both tracked in metadata, only the success consulted.
        assert_eq!(
            synthesis.services_referenced,
            vec![ServiceKind::Compliance, ServiceKind::Schedule]
        );
        assert_eq!(synthesis.services_consulted, vec![ServiceKind::Compliance]);
        assert!(synthesis.backend_data_included);
    }

    #[test]
    fn no_dispatch_passes_completion_text_through_verbatim() {
        let synthesis = synthesize("Hello! How can I help?", None, &[], &[], "hello");

        assert_eq!(synthesis.content, "Hello! How can I help?");
        assert!(synthesis.services_consulted.is_empty());
        assert!(!synthesis.backend_data_included);
    }

    #[test]
    fn consulted_is_subset_of_dispatched_successes() {
        let results = vec![
            success(ServiceKind::Risk, json!({"open": 4})),
            ServiceCallResult {
                service: ServiceKind::Budget,
                outcome: ServiceCallOutcome::Error("502".into()),
            },
        ];

        let synthesis = synthesize("text", None, &results, &[], "q");

        for kind in &synthesis.services_consulted {
            assert!(results.iter().any(|r| r.service == *kind && r.is_success()));
        }
    }

    #[test]
    fn mentions_in_text_are_referenced_without_being_consulted() {
        let synthesis = synthesize(
            "You should review the budget assumptions.",
            None,
            &[],
            &[],
            "what should I review?",
        );

        assert_eq!(synthesis.services_referenced, vec![ServiceKind::Budget]);
        assert!(synthesis.services_consulted.is_empty());
    }
}
