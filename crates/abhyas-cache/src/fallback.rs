//! Bundled fallback datasets, one per category.
//!
//! Pure, synchronous, and infallible: the data is constructed in code at
//! build time, so every other component has a terminal degradation path.
//! Content is a compact snapshot of each category, enough to render a useful
//! screen offline; the live store supersedes it on the next successful fetch.
//!
//! Maps deliberately has no bundled data (see crate docs); its arm returns
//! the explicit empty structure.

use serde_json::json;

use abhyas_core::{
    CardSection, CategoryId, CategoryPayload, MapsPayload, ReferenceDeck, TimelineEvent,
};

/// Bundled payload for a category. Always succeeds.
pub fn get(category: CategoryId) -> CategoryPayload {
    match category {
        CategoryId::Economy => CategoryPayload::Reference(economy()),
        CategoryId::Polity => CategoryPayload::Reference(polity()),
        CategoryId::Geography => CategoryPayload::Reference(geography()),
        CategoryId::Environment => CategoryPayload::Reference(environment()),
        CategoryId::ScienceTech => CategoryPayload::Reference(science_tech()),
        CategoryId::IndianHistory => CategoryPayload::Timeline(indian_history()),
        CategoryId::WorldHistory => CategoryPayload::Timeline(world_history()),
        CategoryId::Maps => CategoryPayload::Maps(MapsPayload::default()),
    }
}

fn economy() -> ReferenceDeck {
    ReferenceDeck {
        title: "Economy".to_string(),
        sections: vec![
            CardSection {
                heading: "Fiscal Policy".to_string(),
                cards: vec![
                    json!({"term": "FRBM Act", "body": "Targets fiscal deficit at 3% of GDP and mandates medium-term fiscal statements."}),
                    json!({"term": "Fiscal Deficit", "body": "Total expenditure minus total receipts excluding borrowings."}),
                ],
            },
            CardSection {
                heading: "Monetary Policy".to_string(),
                cards: vec![
                    json!({"term": "Repo Rate", "body": "Rate at which the RBI lends short-term funds against government securities."}),
                    json!({"term": "MPC", "body": "Six-member committee that sets the policy rate to hold CPI inflation at 4% (+/- 2%)."}),
                ],
            },
        ],
    }
}

fn polity() -> ReferenceDeck {
    ReferenceDeck {
        title: "Polity".to_string(),
        sections: vec![
            CardSection {
                heading: "Constitutional Framework".to_string(),
                cards: vec![
                    json!({"term": "Basic Structure", "body": "Doctrine from Kesavananda Bharati (1973): Parliament cannot amend the Constitution's core features."}),
                    json!({"term": "Article 368", "body": "Procedure for constitutional amendment; special majority, with ratification for federal provisions."}),
                ],
            },
            CardSection {
                heading: "Union Executive".to_string(),
                cards: vec![
                    json!({"term": "Article 74", "body": "Council of Ministers with the PM at its head aids and advises the President."}),
                    json!({"term": "Ordinance Power", "body": "Article 123: President may promulgate ordinances when Parliament is not in session."}),
                ],
            },
        ],
    }
}

fn geography() -> ReferenceDeck {
    ReferenceDeck {
        title: "Geography".to_string(),
        sections: vec![
            CardSection {
                heading: "Physical".to_string(),
                cards: vec![
                    json!({"term": "Western Ghats", "body": "Block mountains along the west coast; orographic rainfall on the windward side."}),
                    json!({"term": "Monsoon Onset", "body": "Normal onset over Kerala around June 1, driven by the ITCZ shift."}),
                ],
            },
            CardSection {
                heading: "Drainage".to_string(),
                cards: vec![
                    json!({"term": "Antecedent Rivers", "body": "Indus, Sutlej, Brahmaputra predate the Himalayas and cut gorges across them."}),
                ],
            },
        ],
    }
}

fn environment() -> ReferenceDeck {
    ReferenceDeck {
        title: "Environment".to_string(),
        sections: vec![
            CardSection {
                heading: "Conventions".to_string(),
                cards: vec![
                    json!({"term": "Ramsar", "body": "Convention on wetlands of international importance; Montreux Record lists threatened sites."}),
                    json!({"term": "CITES", "body": "Regulates international trade in endangered species through appendix listings."}),
                ],
            },
            CardSection {
                heading: "Domestic Law".to_string(),
                cards: vec![
                    json!({"term": "EPA 1986", "body": "Umbrella act empowering the Centre to set standards and restrict industrial locations."}),
                ],
            },
        ],
    }
}

fn science_tech() -> ReferenceDeck {
    ReferenceDeck {
        title: "Science & Technology".to_string(),
        sections: vec![
            CardSection {
                heading: "Space".to_string(),
                cards: vec![
                    json!({"term": "GSLV Mk III", "body": "ISRO's heavy-lift vehicle; cryogenic upper stage, used for Chandrayaan missions."}),
                ],
            },
            CardSection {
                heading: "Biotech".to_string(),
                cards: vec![
                    json!({"term": "CRISPR-Cas9", "body": "Programmable gene editing using a guide RNA and the Cas9 nuclease."}),
                    json!({"term": "mRNA Vaccines", "body": "Deliver messenger RNA encoding an antigen; no live pathogen involved."}),
                ],
            },
        ],
    }
}

fn indian_history() -> Vec<TimelineEvent> {
    vec![
        TimelineEvent {
            year: 1857,
            title: "Revolt of 1857".to_string(),
            description: "First large-scale uprising against Company rule; Crown takes over in 1858."
                .to_string(),
        },
        TimelineEvent {
            year: 1885,
            title: "Indian National Congress founded".to_string(),
            description: "First session at Bombay under W.C. Bonnerjee.".to_string(),
        },
        TimelineEvent {
            year: 1930,
            title: "Dandi March".to_string(),
            description: "Civil disobedience begins with the salt satyagraha.".to_string(),
        },
        TimelineEvent {
            year: 1947,
            title: "Independence and Partition".to_string(),
            description: "Transfer of power under the Indian Independence Act.".to_string(),
        },
    ]
}

fn world_history() -> Vec<TimelineEvent> {
    vec![
        TimelineEvent {
            year: 1789,
            title: "French Revolution".to_string(),
            description: "Fall of the Bastille; Declaration of the Rights of Man.".to_string(),
        },
        TimelineEvent {
            year: 1917,
            title: "Russian Revolution".to_string(),
            description: "February and October revolutions end Tsarist rule.".to_string(),
        },
        TimelineEvent {
            year: 1945,
            title: "End of World War II".to_string(),
            description: "Axis surrender; United Nations founded at San Francisco.".to_string(),
        },
    ]
}
