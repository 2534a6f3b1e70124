//! End-to-end resolution over hand-annotated documents.

mod fixtures;

use fixtures::{scenario_a, scenario_b, sentence, tables, without_parses};
use sieve_coref::{Document, Resolver, ResolverConfig, SieveKind};

fn resolver() -> Resolver {
    Resolver::with_defaults(tables())
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_a_pronouns_follow_dan() {
    let res = resolver().resolve(&scenario_a());

    let ramage = res.chain_of_token(0, 1).expect("Ramage is in a mention");
    let he = res.chain_of_token(1, 0).expect("He is a mention");
    let he_lower = res.chain_of_token(2, 3).expect("he is a mention");
    let ed = res.chain_of_token(3, 0).expect("Ed is a mention");

    assert_eq!(ramage, he);
    assert_eq!(he, he_lower);
    assert_ne!(ed, ramage);
}

#[test]
fn test_scenario_a_places_and_singletons() {
    let res = resolver().resolve(&scenario_a());

    assert_eq!(res.chain_of_token(1, 3), res.chain_of_token(3, 4));
    let microsoft = res.chain_of_span(0, 5, 6).unwrap();
    assert!(microsoft > 0);
    assert_eq!(res.chain(microsoft).unwrap().len(), 1);
    assert_ne!(Some(microsoft), res.chain_of_token(0, 0));
    // "is working for" and punctuation are outside every mention
    assert_eq!(res.chain_of_token(0, 3), None);
    assert_eq!(res.chain_of_token(1, 4), None);
}

#[test]
fn test_scenario_b_mom_and_denver() {
    let res = resolver().resolve(&scenario_b());

    let mom = res.chain_of_span(0, 0, 2).unwrap();
    assert_eq!(res.chain_of_token(0, 1), Some(mom));
    assert_eq!(res.chain_of_token(0, 3), Some(mom));
    assert_eq!(res.chain_of_token(1, 0), Some(mom));

    let denver = res.chain_of_token(0, 6).unwrap();
    assert_eq!(res.chain_of_token(1, 5), Some(denver));
    assert_ne!(mom, denver);
}

#[test]
fn test_scenario_b_copula_links_it_and_city() {
    let res = resolver().resolve(&scenario_b());
    assert_eq!(res.chain_of_span(0, 9, 10), res.chain_of_span(0, 11, 14));
    // "Your" is second person and stays apart from the mother
    assert_ne!(res.chain_of_span(0, 0, 1), res.chain_of_span(0, 0, 2));
}

#[test]
fn test_chain_ids_are_earliest_mentions() {
    let res = resolver().resolve(&scenario_a());
    for chain in res.chains.values() {
        let first = chain.representative().unwrap();
        assert_eq!(first.mention_id, chain.id);
        assert!(chain.mentions.iter().all(|m| m.mention_id >= chain.id));
        assert!(chain
            .mentions
            .windows(2)
            .all(|w| (w[0].sentence, w[0].start) <= (w[1].sentence, w[1].start)));
    }
}

#[test]
fn test_annotate_stamps_tokens() {
    let mut doc = scenario_a();
    let res = resolver().annotate(&mut doc);
    assert_eq!(doc.chain_at(1, 0), res.chain_of_token(1, 0));
    assert_eq!(doc.chain_at(0, 0), doc.chain_at(2, 3));
    assert_eq!(doc.chain_at(0, 2), None);
}

// =============================================================================
// Boundaries and degradation
// =============================================================================

#[test]
fn test_empty_document() {
    let res = resolver().resolve(&Document::default());
    assert!(res.is_empty());
    assert!(res.token_chains.is_empty());
}

#[test]
fn test_document_without_mentions() {
    let doc = Document::new(vec![sentence(
        &[("Go", "VB", "O"), ("!", ".", "O")],
        Some("(ROOT (S (VP (VB Go)) (. !)))"),
    )]);
    let res = resolver().resolve(&doc);
    assert!(res.is_empty());
    assert_eq!(res.token_chains, vec![vec![None, None]]);
}

#[test]
fn test_singleton_gets_valid_chain() {
    let doc = Document::new(vec![sentence(
        &[("Microsoft", "NNP", "ORGANIZATION"), ("grew", "VBD", "O"), (".", ".", "O")],
        Some("(ROOT (S (NP (NNP Microsoft)) (VP (VBD grew)) (. .)))"),
    )]);
    let res = resolver().resolve(&doc);
    assert_eq!(res.len(), 1);
    assert_eq!(res.chain_of_token(0, 0), Some(1));
    assert_eq!(res.chain(1).unwrap().len(), 1);
}

#[test]
fn test_missing_parses_degrade() {
    let res = resolver().resolve(&without_parses(scenario_a()));
    let dan = res.chain_of_token(0, 0).unwrap();
    assert_eq!(res.chain_of_span(0, 0, 2), Some(dan));
    assert_eq!(res.chain_of_token(1, 0), Some(dan));
    assert_eq!(res.chain_of_token(2, 3), Some(dan));
    assert_ne!(res.chain_of_token(3, 0), Some(dan));
}

#[test]
fn test_malformed_parse_degrades_one_sentence() {
    let mut doc = scenario_a();
    doc.sentences[0].parse = Some("(ROOT (S (NP (NNP Dan)".to_string());
    doc.sentences[3].parse = Some("(ROOT (S (NP (NNP Ed)) (. .)))".to_string());
    let res = resolver().resolve(&doc);
    // named entities survive without a usable tree
    assert!(res.chain_of_span(0, 0, 2).is_some());
    assert!(res.chain_of_span(3, 0, 1).is_some());
    assert_eq!(res.chain_of_token(1, 0), res.chain_of_token(0, 0));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_sieve_subset() {
    let config = ResolverConfig::default().with_sieves(["pronoun"]);
    let r = Resolver::new(tables(), config).unwrap();
    assert_eq!(r.sieves(), &[SieveKind::Pronoun]);

    let res = r.resolve(&scenario_a());
    assert_ne!(res.chain_of_token(1, 3), res.chain_of_token(3, 4));
    assert_eq!(res.chain_of_token(1, 0), res.chain_of_token(0, 0));
}

#[test]
fn test_sieve_list_order_is_ignored() {
    let config = ResolverConfig::default().with_sieves(["pronoun", "exact_string"]);
    let r = Resolver::new(tables(), config).unwrap();
    assert_eq!(r.sieves(), &[SieveKind::ExactString, SieveKind::Pronoun]);
}

#[test]
fn test_zero_pronoun_window_keeps_pronoun_in_sentence() {
    let config = ResolverConfig::default().with_pronoun_window(0);
    let r = Resolver::new(tables(), config).unwrap();
    let res = r.resolve(&scenario_a());
    assert_ne!(res.chain_of_token(1, 0), res.chain_of_token(0, 0));
}

#[test]
fn test_invalid_configs_fail_at_construction() {
    for sieves in [vec![], vec!["pronoun", "pronoun"], vec!["nope"]] {
        let config = ResolverConfig::default().with_sieves(sieves);
        let err = Resolver::new(tables(), config).unwrap_err();
        assert!(err.is_fatal_config(), "{err}");
    }
}

// =============================================================================
// Constructs and speakers
// =============================================================================

#[test]
fn test_apposition() {
    let doc = Document::new(vec![sentence(
        &[
            ("Obama", "NNP", "PERSON"),
            (",", ",", "O"),
            ("the", "DT", "O"),
            ("president", "NN", "O"),
            (",", ",", "O"),
            ("spoke", "VBD", "O"),
        ],
        Some("(ROOT (S (NP (NP (NNP Obama)) (, ,) (NP (DT the) (NN president)) (, ,)) (VP (VBD spoke))))"),
    )]);
    let res = resolver().resolve(&doc);
    assert_eq!(res.chain_of_span(0, 2, 4), res.chain_of_span(0, 0, 1));
}

#[test]
fn test_numbered_names_stay_apart() {
    let apollo = |number: &str, verb: &str| {
        let parse = format!(
            "(ROOT (S (NP (NNP Apollo) (CD {})) (VP (VBD {})) (. .)))",
            number, verb
        );
        sentence(
            &[("Apollo", "NNP", "MISC"), (number, "CD", "MISC"), (verb, "VBD", "O"), (".", ".", "O")],
            Some(parse.as_str()),
        )
    };
    let doc = Document::new(vec![
        apollo("11", "landed"),
        apollo("13", "failed"),
        apollo("11", "returned"),
    ]);
    let (res, passes) = resolver().resolve_traced(&doc);
    assert_ne!(res.chain_of_span(0, 0, 2), res.chain_of_span(1, 0, 2));
    assert_eq!(res.chain_of_span(0, 0, 2), res.chain_of_span(2, 0, 2));
    assert_eq!(res.len(), 2);
    let relaxed = passes
        .iter()
        .find(|p| p.sieve == SieveKind::RelaxedString)
        .expect("relaxed_string ran");
    assert_eq!(relaxed.merges, 0);
}

#[test]
fn test_demonym() {
    let doc = Document::new(vec![
        sentence(
            &[("The", "DT", "O"), ("Americans", "NNPS", "MISC"), ("came", "VBD", "O"), (".", ".", "O")],
            Some("(ROOT (S (NP (DT The) (NNPS Americans)) (VP (VBD came)) (. .)))"),
        ),
        sentence(
            &[("America", "NNP", "LOCATION"), ("cheered", "VBD", "O"), (".", ".", "O")],
            Some("(ROOT (S (NP (NNP America)) (VP (VBD cheered)) (. .)))"),
        ),
    ]);
    let res = resolver().resolve(&doc);
    assert_eq!(res.chain_of_token(1, 0), res.chain_of_token(0, 1));
}

fn spoken(speaker: &str, word: &str, pos: &str, ner: &str) -> sieve_coref::Sentence {
    let parse = format!("(ROOT (S (NP ({} {})) (VP (VBD spoke)) (. .)))", pos, word);
    sentence(
        &[(word, pos, ner), ("spoke", "VBD", "O"), (".", ".", "O")],
        Some(&parse),
    )
    .with_speaker(speaker)
}

#[test]
fn test_first_person_follows_speaker() {
    let doc = Document::new(vec![
        spoken("Dan", "I", "PRP", "O"),
        spoken("Mary", "I", "PRP", "O"),
        spoken("Dan", "I", "PRP", "O"),
    ]);
    let res = resolver().resolve(&doc);
    assert_eq!(res.chain_of_token(0, 0), res.chain_of_token(2, 0));
    assert_ne!(res.chain_of_token(0, 0), res.chain_of_token(1, 0));
}

#[test]
fn test_first_person_links_to_speaker_name() {
    let doc = Document::new(vec![
        sentence(
            &[("Dan", "NNP", "PERSON"), ("spoke", "VBD", "O"), (".", ".", "O")],
            Some("(ROOT (S (NP (NNP Dan)) (VP (VBD spoke)) (. .)))"),
        ),
        spoken("Mary", "I", "PRP", "O"),
        spoken("Dan", "I", "PRP", "O"),
    ]);
    let res = resolver().resolve(&doc);
    assert_eq!(res.chain_of_token(2, 0), res.chain_of_token(0, 0));
    assert_ne!(res.chain_of_token(1, 0), res.chain_of_token(0, 0));
}
