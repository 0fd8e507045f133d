use mockall::automock;

/// Injected wall clock.  Business logic never reads the ambient clock
/// directly so "now" stays deterministic in tests.
#[automock]
pub trait ClockService {
    fn date_now(&self) -> time::Date;
    fn date_time_now(&self) -> time::PrimitiveDateTime;
}
