//! In-memory doubles for the store-backed traits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use gateway_core::{ClickEvent, Error, InquiryRecord, Result, TourDetail};
use parking_lot::Mutex;
use store_client::{EventStore, InquiryNotifier, TourCatalog};

/// Mock catalog backed by a slug map.
#[derive(Clone, Default)]
pub struct MockCatalog {
    tours: Arc<Mutex<HashMap<String, TourDetail>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tour under its slug.
    pub fn insert(&self, tour: TourDetail) {
        self.tours.lock().insert(tour.slug.clone(), tour);
    }

    /// Make every lookup fail, simulating a store outage.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock() = should_fail;
    }
}

#[async_trait]
impl TourCatalog for MockCatalog {
    async fn tour_detail(&self, slug: &str) -> Result<Option<TourDetail>> {
        if *self.should_fail.lock() {
            return Err(Error::upstream("mock catalog unavailable"));
        }
        Ok(self.tours.lock().get(slug).cloned())
    }
}

/// Mock event store capturing every write.
#[derive(Clone, Default)]
pub struct MockEventStore {
    inquiries: Arc<Mutex<Vec<InquiryRecord>>>,
    clicks: Arc<Mutex<Vec<ClickEvent>>>,
    fail_inquiries: Arc<Mutex<bool>>,
    fail_clicks: Arc<Mutex<bool>>,
}

impl MockEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured_inquiries(&self) -> Vec<InquiryRecord> {
        self.inquiries.lock().clone()
    }

    pub fn inquiry_count(&self) -> usize {
        self.inquiries.lock().len()
    }

    pub fn captured_clicks(&self) -> Vec<ClickEvent> {
        self.clicks.lock().clone()
    }

    pub fn click_count(&self) -> usize {
        self.clicks.lock().len()
    }

    pub fn set_fail_inquiries(&self, should_fail: bool) {
        *self.fail_inquiries.lock() = should_fail;
    }

    pub fn set_fail_clicks(&self, should_fail: bool) {
        *self.fail_clicks.lock() = should_fail;
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn insert_inquiry(&self, record: &InquiryRecord) -> Result<()> {
        if *self.fail_inquiries.lock() {
            return Err(Error::upstream("mock store unavailable"));
        }
        self.inquiries.lock().push(record.clone());
        Ok(())
    }

    async fn insert_click(&self, event: &ClickEvent) -> Result<()> {
        if *self.fail_clicks.lock() {
            return Err(Error::upstream("mock store unavailable"));
        }
        self.clicks.lock().push(event.clone());
        Ok(())
    }
}

/// Mock notifier recording every delivered inquiry.
#[derive(Clone, Default)]
pub struct MockNotifier {
    delivered: Arc<Mutex<Vec<InquiryRecord>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<InquiryRecord> {
        self.delivered.lock().clone()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.lock().len()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock() = should_fail;
    }
}

#[async_trait]
impl InquiryNotifier for MockNotifier {
    async fn notify_inquiry(&self, record: &InquiryRecord) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(Error::upstream("mock webhook unreachable"));
        }
        self.delivered.lock().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn test_mock_catalog_returns_inserted_tour() {
        let catalog = MockCatalog::new();
        let tour = fixtures::blue_eye_tour();
        catalog.insert(tour.clone());

        let found = catalog.tour_detail(&tour.slug).await.unwrap();
        assert_eq!(found.unwrap().id, tour.id);

        let missing = catalog.tour_detail("no-such-tour").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_mock_catalog_failure_mode() {
        let catalog = MockCatalog::new();
        catalog.set_should_fail(true);
        assert!(catalog.tour_detail("anything").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_event_store_captures_clicks() {
        let store = MockEventStore::new();
        let click = fixtures::click_event(&fixtures::blue_eye_tour());

        store.insert_click(&click).await.unwrap();
        assert_eq!(store.click_count(), 1);
        assert_eq!(store.captured_clicks()[0].tour_slug, click.tour_slug);

        store.set_fail_clicks(true);
        assert!(store.insert_click(&click).await.is_err());
        assert_eq!(store.click_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_notifier_failure_mode() {
        let notifier = MockNotifier::new();
        notifier.set_should_fail(true);
        let record = fixtures::inquiry_record(&fixtures::blue_eye_tour());
        assert!(notifier.notify_inquiry(&record).await.is_err());
        assert_eq!(notifier.delivered_count(), 0);
    }
}
