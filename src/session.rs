use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::{
    api::catalog::PlanSource,
    core::{
        aggregate::WeeklyAggregate,
        evaluator::Evaluator,
        export::ParsedExport,
        filter::Filters,
        pipeline::{ingest, reprocess},
        plan::Plan,
        ranking::rank,
    },
    prelude::*,
    report::{Ranking, Report},
};

/// Outcome of a catalog load, shared by everyone who waited for it.
pub type Loaded = Result<Arc<Vec<Plan>>, Arc<Error>>;

/// State held by a front end between filter changes.
///
/// The catalog is fetched at most once: concurrent callers share the in-flight attempt
/// and observe the same outcome. A failed attempt is discarded once it resolves,
/// so a later call starts a new one.
pub struct Session<S> {
    source: S,
    attempt: Mutex<Arc<OnceCell<Loaded>>>,
    export: ParsedExport,
}

impl<S: PlanSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self { source, attempt: Mutex::default(), export: ParsedExport::default() }
    }

    /// Load the catalog unless it is already loaded.
    pub async fn plans(&self) -> Loaded {
        let attempt = self.attempt.lock().await.clone();
        let loaded = attempt
            .get_or_init(|| async {
                self.source.fetch_plans().await.map(Arc::new).map_err(Arc::new)
            })
            .await
            .clone();
        if loaded.is_err() {
            let mut current = self.attempt.lock().await;
            if Arc::ptr_eq(&*current, &attempt) {
                *current = Arc::default();
            }
        }
        loaded
    }

    /// Replace the held export and return the default filters for it.
    pub fn ingest(&mut self, text: &str) -> Result<Filters> {
        let ingested = ingest(text)?;
        self.export = ingested.export;
        Ok(ingested.defaults)
    }

    pub const fn export(&self) -> &ParsedExport {
        &self.export
    }

    /// Process the held export with the filters, falling back to an unavailable ranking
    /// when the catalog cannot be loaded.
    ///
    /// An export without records ranks nothing.
    #[instrument(skip_all)]
    pub async fn report(&self, filters: &Filters) -> Report {
        let aggregates = reprocess(&self.export, filters);
        let ranking = if self.export.records.is_empty() {
            Ranking::Ready { plans: Vec::new() }
        } else {
            self.ranking(&aggregates.weekly, filters.discount_year).await
        };
        Report {
            header: self.export.header.clone(),
            summary: self.export.summary.clone(),
            filters: *filters,
            hourly: aggregates.hourly,
            ranking,
        }
    }

    pub async fn ranking(&self, weekly: &WeeklyAggregate, discount_year: usize) -> Ranking {
        match self.plans().await {
            Ok(plans) => {
                let evaluated = Evaluator::builder()
                    .weekly(weekly)
                    .plans(plans.as_slice())
                    .discount_year(discount_year)
                    .build()
                    .evaluate();
                Ranking::Ready { plans: rank(evaluated) }
            }
            Err(error) => {
                error!("plan ranking is unavailable: {error:#}");
                Ranking::Unavailable { reason: format!("{error:#}") }
            }
        }
    }

    /// Drop the export and the cached catalog.
    pub fn teardown(&mut self) {
        self.export = ParsedExport::default();
        *self.attempt.get_mut() = Arc::default();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use approx::assert_abs_diff_eq;
    use async_trait::async_trait;
    use enumset::EnumSet;

    use super::*;
    use crate::{
        core::{export::tests::export, plan::tests::catalog},
        quantity::energy::KilowattHours,
    };

    /// Counts the fetches and fails the first `n_failures` of them.
    struct FakeSource {
        n_fetches: AtomicUsize,
        n_failures: usize,
    }

    impl FakeSource {
        const fn failing(n_failures: usize) -> Self {
            Self { n_fetches: AtomicUsize::new(0), n_failures }
        }
    }

    #[async_trait]
    impl PlanSource for FakeSource {
        async fn fetch_plans(&self) -> Result<Vec<Plan>> {
            let n_fetches = self.n_fetches.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::task::yield_now().await;
            ensure!(n_fetches > self.n_failures, "catalog is down");
            Ok(catalog())
        }
    }

    const ROWS: [&str; 3] = [
        // Saturday:
        r#"01/06/2024,6:00,"1.5""#,
        r#"01/06/2024,14:00,"2.5""#,
        // Sunday:
        r#"02/06/2024,9:00,"4.0""#,
    ];

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let session = Session::new(FakeSource::failing(0));
        let weekly = WeeklyAggregate::default();
        let (left, right) =
            tokio::join!(session.ranking(&weekly, 0), session.ranking(&weekly, 0));
        assert_eq!(left, right);
        assert!(matches!(left, Ranking::Ready { .. }));
        assert_eq!(session.source.n_fetches.load(Ordering::SeqCst), 1);

        let _ = session.ranking(&weekly, 1).await;
        assert_eq!(session.source.n_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_failure() {
        let session = Session::new(FakeSource::failing(1));
        let weekly = WeeklyAggregate::default();
        let (left, right) =
            tokio::join!(session.ranking(&weekly, 0), session.ranking(&weekly, 0));
        assert_eq!(left, right);
        assert!(matches!(left, Ranking::Unavailable { .. }));
        assert_eq!(session.source.n_fetches.load(Ordering::SeqCst), 1);

        // The next call retries.
        assert!(matches!(session.ranking(&weekly, 0).await, Ranking::Ready { .. }));
        assert_eq!(session.source.n_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_catalog_failure_keeps_usage() -> Result {
        let mut session = Session::new(FakeSource::failing(1));
        let filters = Filters { dates: Default::default(), ..session.ingest(&export(&ROWS))? };

        let report = session.report(&filters).await;
        assert_eq!(report.header.customer_name, "Jane Doe");
        assert_eq!(report.hourly.iter().count(), 3);
        let Ranking::Unavailable { reason } = report.ranking else {
            bail!("the ranking should be unavailable");
        };
        assert!(reason.contains("catalog is down"));

        // The failure is not cached.
        let report = session.report(&filters).await;
        let Ranking::Ready { plans } = report.ranking else {
            bail!("the ranking should be ready");
        };
        assert_eq!(plans.len(), 3);
        assert_eq!(session.source.n_fetches.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_report() -> Result {
        let mut session = Session::new(FakeSource::failing(0));
        let defaults = session.ingest(&export(&ROWS))?;

        // The default start skips the first day.
        let report = session.report(&defaults).await;
        assert_eq!(report.hourly.iter().count(), 1);

        let report = session.report(&Filters::default()).await;
        assert_eq!(format!("{:.2}", report.summary.total.0), "8.00");
        let Ranking::Ready { plans } = report.ranking else {
            bail!("the ranking should be ready");
        };
        // 15% of Sunday 9:00 beats 7% of everything and 20% of Saturday 6:00.
        assert_eq!(plans[0].company_name, "Bezeq");
        assert_abs_diff_eq!(plans[0].kwh_free.0, 0.6, epsilon = 1e-9);
        assert_eq!(plans[1].company_name, "Cellcom");
        assert_abs_diff_eq!(plans[1].kwh_free.0, 0.56, epsilon = 1e-9);
        assert_eq!(plans[2].company_name, "Electra");
        assert_abs_diff_eq!(plans[2].kwh_free.0, 0.3, epsilon = 1e-9);
        Ok(())
    }

    #[tokio::test]
    async fn test_teardown() -> Result {
        let mut session = Session::new(FakeSource::failing(0));
        session.ingest(&export(&ROWS))?;
        assert!(session.plans().await.is_ok());
        session.teardown();
        assert!(session.export().records.is_empty());
        assert!(session.plans().await.is_ok());
        assert_eq!(session.source.n_fetches.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_session() -> Result {
        let mut session = Session::new(FakeSource::failing(0));
        let defaults = session.ingest("")?;
        let report = session.report(&defaults).await;
        assert!(report.hourly.is_empty());
        assert_eq!(report.ranking, Ranking::Ready { plans: Vec::new() });
        Ok(())
    }

    #[tokio::test]
    async fn test_filtered_out_export_still_ranks() -> Result {
        let mut session = Session::new(FakeSource::failing(0));
        session.ingest(&export(&ROWS))?;
        let filters = Filters { weekdays: EnumSet::empty(), ..Filters::default() };
        let report = session.report(&filters).await;
        let Ranking::Ready { plans } = report.ranking else {
            bail!("the ranking should be ready");
        };
        assert_eq!(plans.len(), 3);
        assert!(plans.iter().all(|plan| plan.kwh_free == KilowattHours::ZERO));
        Ok(())
    }
}
