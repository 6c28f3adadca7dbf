//! Shared documents and store doubles.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use concierge::documents::{
    AdCandidate, EngagementEvent, LocalizedText, QaItem, ServiceDocument, Subservice, UserProfile,
};
use concierge::store::{DocumentStore, MemoryStore, SeedData, StoreResult};

fn qa(question: &str, answer: &str) -> QaItem {
    QaItem {
        question: LocalizedText::plain(question),
        answer: LocalizedText::plain(answer),
        ..Default::default()
    }
}

pub fn services() -> Vec<ServiceDocument> {
    vec![
        ServiceDocument {
            id: "imm".to_string(),
            name: LocalizedText::plain("Immigration and Emigration"),
            description: LocalizedText::plain("Passports, visas and citizenship"),
            subservices: vec![Subservice {
                id: "passport".to_string(),
                name: LocalizedText::plain("Passport"),
                questions: vec![
                    qa(
                        "How do I renew my passport?",
                        "Apply online, then visit the head office with your NIC.",
                    ),
                    qa("  ", "orphan answer"),
                    qa("What is the one-day service fee?", "LKR 20,000."),
                ],
            }],
            ..Default::default()
        },
        ServiceDocument {
            id: "edu".to_string(),
            name: LocalizedText::plain("Examinations Department"),
            description: LocalizedText::plain("O/L and A/L results and certificates"),
            subservices: vec![Subservice {
                id: "results".to_string(),
                name: LocalizedText::plain("Results"),
                questions: vec![qa(
                    "When are A/L results released?",
                    "Usually in the first quarter of the year.",
                )],
            }],
            ..Default::default()
        },
    ]
}

pub fn government_officer() -> UserProfile {
    UserProfile {
        id: "officer".to_string(),
        age: Some(30),
        education: Some("degree".to_string()),
        job: Some("Government Officer".to_string()),
        ..Default::default()
    }
}

pub fn seed() -> SeedData {
    let mut clicked = EngagementEvent::new("officer", "question_click");
    clicked.desires = vec!["jobs".to_string()];

    SeedData {
        services: services(),
        users: vec![government_officer()],
        engagements: vec![clicked],
        ads: vec![
            AdCandidate {
                id: "b".to_string(),
                title: "Generic".to_string(),
                active: true,
                ..Default::default()
            },
            AdCandidate {
                id: "a".to_string(),
                title: "Public sector jobs".to_string(),
                tags: vec!["jobs".to_string()],
                target_segments: vec!["early_career".to_string()],
                created: Some(Utc::now() - Duration::days(3)),
                active: true,
                ..Default::default()
            },
            AdCandidate {
                id: "retired".to_string(),
                title: "Old campaign".to_string(),
                target_segments: vec!["early_career".to_string()],
                active: false,
                ..Default::default()
            },
        ],
    }
}

/// Memory store that counts how often the raw documents are read.
#[derive(Debug)]
pub struct CountingStore {
    inner: MemoryStore,
    service_reads: AtomicUsize,
}

impl CountingStore {
    pub fn new(seed: SeedData) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::from_seed(seed),
            service_reads: AtomicUsize::new(0),
        })
    }

    pub fn service_reads(&self) -> usize {
        self.service_reads.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.service_reads.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn services(&self) -> StoreResult<Vec<ServiceDocument>> {
        self.service_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.services().await
    }

    async fn user_profile(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        self.inner.user_profile(user_id).await
    }

    async fn engagements(&self, user_id: &str) -> StoreResult<Vec<EngagementEvent>> {
        self.inner.engagements(user_id).await
    }

    async fn active_ads(&self) -> StoreResult<Vec<AdCandidate>> {
        self.inner.active_ads().await
    }

    async fn append_engagement(&self, event: EngagementEvent) -> StoreResult<()> {
        self.inner.append_engagement(event).await
    }
}
