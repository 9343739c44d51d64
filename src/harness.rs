//! Per-case fixture lifecycle and pass/fail bookkeeping.
//!
//! Every case gets its own `CollectionFixture`, set up before the body runs
//! and torn down after it, so nothing a case does to its sequence can leak
//! into the next one. The only thing shared between cases is the RNG held by
//! the `Environment`, which is seeded once per process.

use {
    crate::sequence::DynamicSequence,
    rand::{rngs::StdRng, Rng, SeedableRng},
    std::{
        any::Any,
        panic::{self, AssertUnwindSafe},
        time::{SystemTime, UNIX_EPOCH},
    },
    tracing::{debug, info, warn},
};

/// Process-wide state created before any case runs
pub struct Environment {
    seed: u64,
    rng: StdRng,
}

impl Environment {
    /// Seeds from the wall clock, so values differ from run to run
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        info!(target: "dynseq::suite", seed, "environment seeded");
        Environment {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Owns the sequence a single case works on
#[derive(Default)]
pub struct CollectionFixture {
    collection: Option<DynamicSequence<i32>>,
}

impl CollectionFixture {
    pub fn new() -> Self {
        CollectionFixture { collection: None }
    }

    /// Installs a fresh empty sequence, replacing any previous one
    pub fn set_up(&mut self) {
        self.collection = Some(DynamicSequence::new());
    }

    /// Empties the sequence, then releases it
    pub fn tear_down(&mut self) {
        if let Some(mut collection) = self.collection.take() {
            collection.clear();
        }
    }

    pub fn is_set_up(&self) -> bool {
        self.collection.is_some()
    }

    pub fn collection(&self) -> &DynamicSequence<i32> {
        self.collection.as_ref().unwrap_or_else(|| not_set_up())
    }

    pub fn collection_mut(&mut self) -> &mut DynamicSequence<i32> {
        self.collection.as_mut().unwrap_or_else(|| not_set_up())
    }

    /// Appends `count` values drawn from 0..=99. `count` must be positive
    pub fn add_entries<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize) {
        assert!(count > 0, "add_entries requires a positive count");
        let collection = self.collection_mut();
        for _ in 0..count {
            collection.push_back(rng.gen_range(0..=99));
        }
    }
}

fn not_set_up() -> ! {
    panic!("collection fixture used outside set_up/tear_down")
}

/// Returned by a hard assertion to stop the current case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort;

pub type CaseResult = std::result::Result<(), Abort>;

/// What a case body sees: its fixture, the shared RNG, and the assertion helpers.
///
/// `expect*` record a failure and let the case keep going.
/// `require*` and `fail` record a failure and return `Err(Abort)`, meant to be
/// propagated with `?`.
pub struct CaseContext<'a> {
    fixture: &'a mut CollectionFixture,
    rng: &'a mut StdRng,
    failures: Vec<String>,
}

impl<'a> CaseContext<'a> {
    pub fn new(fixture: &'a mut CollectionFixture, rng: &'a mut StdRng) -> Self {
        CaseContext {
            fixture,
            rng,
            failures: Vec::new(),
        }
    }

    pub fn fixture(&self) -> &CollectionFixture {
        &*self.fixture
    }

    pub fn collection(&self) -> &DynamicSequence<i32> {
        self.fixture.collection()
    }

    pub fn collection_mut(&mut self) -> &mut DynamicSequence<i32> {
        self.fixture.collection_mut()
    }

    pub fn add_entries(&mut self, count: usize) {
        self.fixture.add_entries(&mut *self.rng, count);
    }

    pub fn expect(&mut self, condition: bool, message: &str) -> bool {
        if !condition {
            self.record(message.to_string());
        }
        condition
    }

    pub fn require(&mut self, condition: bool, message: &str) -> CaseResult {
        if self.expect(condition, message) { Ok(()) } else { Err(Abort) }
    }

    pub fn fail(&mut self, message: &str) -> CaseResult {
        self.record(message.to_string());
        Err(Abort)
    }

    pub fn expect_err<T, E>(&mut self, result: &std::result::Result<T, E>, message: &str) -> bool {
        self.expect(result.is_err(), message)
    }

    pub fn require_err<T, E>(&mut self, result: &std::result::Result<T, E>, message: &str) -> CaseResult {
        self.require(result.is_err(), message)
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    fn record(&mut self, message: String) {
        debug!(target: "dynseq::suite", %message, "check failed");
        self.failures.push(message);
    }

    fn into_failures(self) -> Vec<String> {
        self.failures
    }
}

pub struct TestCase {
    pub name: &'static str,
    pub body: fn(&mut CaseContext<'_>) -> CaseResult,
}

/// Outcome of one case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub name: &'static str,
    pub failures: Vec<String>,
    /// the body stopped early, through a hard assertion or a panic
    pub aborted: bool,
    pub panicked: bool,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn cases(&self) -> &[CaseReport] {
        &self.cases
    }

    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.name == name)
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// 0 when every case passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() { 0 } else { 1 }
    }
}

/// An ordered list of cases, run one after another
#[derive(Default)]
pub struct Suite {
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new() -> Self {
        Suite { cases: Vec::new() }
    }

    pub fn add(&mut self, case: TestCase) -> &mut Self {
        self.cases.push(case);
        self
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn run(&self, env: &mut Environment) -> SuiteReport {
        let cases = self.cases.iter().map(|case| run_case(case, env)).collect();
        SuiteReport { cases }
    }
}

impl Extend<TestCase> for Suite {
    fn extend<U: IntoIterator<Item=TestCase>>(&mut self, cases: U) {
        self.cases.extend(cases);
    }
}

fn run_case(case: &TestCase, env: &mut Environment) -> CaseReport {
    let mut fixture = CollectionFixture::new();
    fixture.set_up();

    let mut ctx = CaseContext::new(&mut fixture, env.rng());
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (case.body)(&mut ctx)));
    let (aborted, panicked) = match outcome {
        Ok(Ok(())) => (false, false),
        Ok(Err(Abort)) => (true, false),
        Err(payload) => {
            ctx.record(format!("panicked: {}", panic_message(payload.as_ref())));
            (true, true)
        }
    };
    let failures = ctx.into_failures();

    fixture.tear_down();

    let report = CaseReport {
        name: case.name,
        failures,
        aborted,
        panicked,
    };
    if report.passed() {
        info!(target: "dynseq::suite", case = case.name, "passed");
    } else {
        warn!(target: "dynseq::suite", case = case.name, failures = report.failures.len(), aborted, "failed");
        for message in &report.failures {
            warn!(target: "dynseq::suite", case = case.name, %message);
        }
    }
    report
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("non-string panic payload")
    }
}
