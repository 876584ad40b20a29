//! Behaviour of the shipped template bank against realistic bundles.

use roast_core::{MetricBundle, Mode, MAX_CLAIMS};
use roast_templates::{build_narrative, TemplateBank};

fn neglected_repo() -> MetricBundle {
    MetricBundle::new()
        .with("totalCommits", 57)
        .with("commitsLast30Days", 0)
        .with("daysSinceLastCommit", 200)
        .with("contributorCount", 2)
        .with("topContributorPct", 90)
        .with("churnRatio", 0.2)
        .with("hasTests", false)
        .with("hasCI", false)
        .with("totalReleases", 0)
        .with("daysSinceLastRelease", None::<i64>)
        .with("readmeLength", 120)
        .with("languageCount", 2)
        .with("activityTrend", "declining")
}

fn healthy_repo() -> MetricBundle {
    MetricBundle::new()
        .with("totalCommits", 4821)
        .with("commitsLast30Days", 45)
        .with("daysSinceLastCommit", 2)
        .with("contributorCount", 12)
        .with("topContributorPct", 35.5)
        .with("churnRatio", 0.18)
        .with("hasTests", true)
        .with("hasCI", true)
        .with("totalReleases", 24)
        .with("daysSinceLastRelease", 12)
        .with("readmeLength", 5400)
        .with("languageCount", 2)
        .with("activityTrend", "rising")
}

fn evidence(narrative: &roast_core::Narrative) -> Vec<Vec<&str>> {
    narrative
        .claims
        .iter()
        .map(|c| c.evidence_keys.iter().map(String::as_str).collect())
        .collect()
}

#[test]
fn neglected_repo_roast_follows_bank_order() {
    let bank = TemplateBank::builtin().unwrap();
    let narrative = build_narrative(&bank, &neglected_repo(), Mode::Roast);

    assert_eq!(narrative.claims.len(), MAX_CLAIMS);
    assert_eq!(
        evidence(&narrative),
        vec![
            vec!["daysSinceLastCommit"],
            vec!["topContributorPct"],
            vec!["hasTests", "hasCI"],
            vec!["totalCommits", "totalReleases"],
            vec!["readmeLength"],
        ]
    );
    assert_eq!(
        narrative.claims[0].text,
        "200 days since anyone pushed a commit. The code isn't resting, it's hibernating."
    );
    assert_eq!(
        narrative.claims[3].text,
        "57 commits and not a single release. Shipping is apparently just a rumour."
    );
    assert!(narrative.text.starts_with("200 days since anyone pushed a commit."));
    assert!(!narrative.text.contains('{'), "unresolved placeholder in: {}", narrative.text);
}

#[test]
fn healthy_repo_praise() {
    let bank = TemplateBank::builtin().unwrap();
    let narrative = build_narrative(&bank, &healthy_repo(), Mode::Praise);

    assert_eq!(narrative.claims.len(), MAX_CLAIMS);
    assert_eq!(
        narrative.claims[0].text,
        "Fresh code: the last commit was only 2 days ago."
    );
    assert_eq!(
        narrative.claims[2].text,
        "12 contributors share the load and nobody owns more than 35.5% of it. That's a healthy bus factor."
    );
    assert_eq!(
        narrative.claims[4].text,
        "24 releases so far, the latest just 12 days ago. Users get a steady stream of improvements."
    );
}

#[test]
fn healthy_repo_roast_falls_back_to_single_line() {
    let bank = TemplateBank::builtin().unwrap();
    let narrative = build_narrative(&bank, &healthy_repo(), Mode::Roast);

    assert_eq!(narrative.claims.len(), 1);
    assert_eq!(narrative.text, "This repo exists. That's... something.");
}

#[test]
fn empty_bundle_falls_back_in_both_tones() {
    let bank = TemplateBank::builtin().unwrap();
    for mode in [Mode::Roast, Mode::Praise] {
        let narrative = build_narrative(&bank, &MetricBundle::new(), mode);
        assert_eq!(narrative.claims.len(), 1);
        assert!(!narrative.text.is_empty());
    }
}

#[test]
fn deterministic_for_same_input() {
    let bank = TemplateBank::builtin().unwrap();
    let metrics = neglected_repo();
    let first = build_narrative(&bank, &metrics, Mode::Roast);
    for _ in 0..10 {
        assert_eq!(build_narrative(&bank, &metrics, Mode::Roast), first);
    }
}

#[test]
fn evidence_is_always_present_in_bundle() {
    let bank = TemplateBank::builtin().unwrap();
    // Sparse variants of both fixtures, dropping one key at a time.
    for base in [neglected_repo(), healthy_repo()] {
        let keys: Vec<String> = base.keys().map(str::to_string).collect();
        for skip in &keys {
            let sparse: MetricBundle = base
                .iter()
                .filter(|(k, _)| *k != skip.as_str())
                .map(|(k, v)| (k, v.clone()))
                .collect();
            for mode in [Mode::Roast, Mode::Praise] {
                let narrative = build_narrative(&bank, &sparse, mode);
                assert!((1..=MAX_CLAIMS).contains(&narrative.claims.len()));
                for claim in &narrative.claims {
                    assert!(claim.is_backed_by(&sparse), "{claim:?} cites a missing key");
                }
            }
        }
    }
}
