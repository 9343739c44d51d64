mod array;
pub mod cases;
pub mod config;
pub mod error;
pub mod harness;
pub mod sequence;

pub use {
    error::{Error, Result},
    sequence::{DynamicSequence, GrowthPolicy},
};

#[cfg(test)]
mod tests {
    use {
        crate::{
            cases,
            config::SuiteConfig,
            error::Error,
            harness::{CaseContext, CaseResult, CollectionFixture, Environment, Suite, TestCase},
            sequence::{DynamicSequence, GrowthPolicy},
        },
        std::{
            cell::Cell,
            collections::HashMap,
            rc::Rc,
        },
        tracing::Level,
    };

    #[test]
    fn new_sequence_is_empty() {
        let s: DynamicSequence<i32> = DynamicSequence::new();
        assert_eq!(s.len(), 0);
        assert_eq!(s.size(), 0);
        assert!(s.is_empty());
        assert_eq!(s.capacity(), 0);
    }

    #[test]
    fn push_back_keeps_order_across_growth() {
        let mut s = DynamicSequence::new();
        for i in 0..100 {
            s.push_back(i);
            assert_eq!(s.len(), i + 1);
            assert!(s.capacity() >= s.len());
        }
        assert_eq!(s.as_slice(), (0..100).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn default_policy_grows_by_half() {
        let mut s = DynamicSequence::new();
        let mut seen = vec![];
        for i in 0..10 {
            s.push_back(i);
            if seen.last() != Some(&s.capacity()) {
                seen.push(s.capacity());
            }
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 6, 9, 13]);
    }

    #[test]
    fn custom_policy_doubles() {
        let mut s = DynamicSequence::with_policy(GrowthPolicy { initial_capacity: 4, growth_percent: 200 });
        assert_eq!(s.capacity(), 4);
        s.extend(0..5);
        assert_eq!(s.capacity(), 8);
        assert_eq!(s.policy().growth_percent, 200);
    }

    #[test]
    #[should_panic(expected = "growth_percent must be above 100")]
    fn policy_must_grow() {
        let _s: DynamicSequence<u8> = DynamicSequence::with_policy(GrowthPolicy { initial_capacity: 0, growth_percent: 100 });
    }

    #[test]
    fn reserve_grows_but_never_shrinks() {
        let mut s = DynamicSequence::new();
        s.extend(0..10);
        let before = s.capacity();

        s.reserve(15);
        assert_eq!(s.len(), 10);
        assert_eq!(s.capacity(), 15);
        assert!(s.capacity() > before);

        s.reserve(3);
        assert_eq!(s.capacity(), 15);
        assert_eq!(s.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn try_reserve_reports_overflow() {
        let mut s: DynamicSequence<u64> = DynamicSequence::new();
        assert_eq!(s.try_reserve(usize::MAX), Err(Error::CapacityOverflow { requested: usize::MAX }));
        assert_eq!(s.capacity(), 0);
        assert_eq!(s.try_reserve(32), Ok(()));
        assert_eq!(s.capacity(), 32);
    }

    #[test]
    fn resize_fills_with_default_and_truncates() {
        let mut s = DynamicSequence::new();
        s.extend_from_slice(&[7, 8]);

        s.resize(5);
        assert_eq!(s.as_slice(), &[7, 8, 0, 0, 0]);
        assert!(s.capacity() >= 5);

        s.resize(1);
        assert_eq!(s.as_slice(), &[7]);

        s.resize(0);
        assert!(s.is_empty());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut s = DynamicSequence::new();
        s.extend(0..20);
        let capacity = s.capacity();
        s.clear();
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), capacity);
    }

    #[test]
    fn erase_interior_range_shifts_tail() {
        let mut s: DynamicSequence<i32> = (0..10).collect::<Vec<_>>().into();
        s.erase(2..5);
        assert_eq!(s.as_slice(), &[0, 1, 5, 6, 7, 8, 9]);

        s.erase(..=1);
        assert_eq!(s.as_slice(), &[5, 6, 7, 8, 9]);

        s.erase(3..3);
        assert_eq!(s.len(), 5);

        s.erase(..);
        assert!(s.is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn erase_past_end_panics() {
        let mut s: DynamicSequence<i32> = vec![1, 2, 3].into();
        s.erase(1..4);
    }

    #[test]
    #[should_panic(expected = "starts at")]
    fn erase_reversed_range_panics() {
        let mut s: DynamicSequence<i32> = vec![1, 2, 3].into();
        s.erase(2..1);
    }

    #[test]
    fn pop_back_returns_last() {
        let mut s: DynamicSequence<i32> = vec![1, 2, 3].into();
        let capacity = s.capacity();
        assert_eq!(s.pop_back(), 3);
        assert_eq!(s.len(), 2);
        assert_eq!(s.capacity(), capacity);
    }

    #[test]
    #[should_panic(expected = "pop_back on empty sequence")]
    fn pop_back_on_empty_panics() {
        let mut s: DynamicSequence<i32> = DynamicSequence::new();
        s.pop_back();
    }

    #[test]
    fn at_checks_length_not_capacity() -> Result<(), Error> {
        let mut s: DynamicSequence<i32> = DynamicSequence::with_capacity(8);
        assert_eq!(s.at(0), Err(Error::OutOfRange { index: 0, len: 0 }));

        s.extend(0..10);
        assert_eq!(*s.at(9)?, 9);
        assert_eq!(s.at(10), Err(Error::OutOfRange { index: 10, len: 10 }));
        assert_eq!(s.at(11), Err(Error::OutOfRange { index: 11, len: 10 }));

        *s.at_mut(3)? = 42;
        assert_eq!(s[3], 42);
        assert!(s.at_mut(10).is_err());
        Ok(())
    }

    #[test]
    fn out_of_range_message_names_index_and_length() {
        let err = Error::OutOfRange { index: 11, len: 10 };
        let msg = err.to_string();
        assert!(msg.contains("11"));
        assert!(msg.contains("10"));
    }

    #[derive(Clone)]
    struct Counted(Rc<Cell<usize>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn every_value_is_dropped_once() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut s = DynamicSequence::new();
            for _ in 0..10 {
                s.push_back(Counted(drops.clone()));
            }
            assert_eq!(drops.get(), 0);

            s.erase(2..5);
            assert_eq!(drops.get(), 3);

            drop(s.pop_back());
            assert_eq!(drops.get(), 4);

            s.clear();
            assert_eq!(drops.get(), 10);

            s.push_back(Counted(drops.clone()));
            s.push_back(Counted(drops.clone()));
        }
        assert_eq!(drops.get(), 12);
    }

    #[test]
    fn zero_sized_values_never_allocate() {
        let mut s = DynamicSequence::new();
        for _ in 0..1000 {
            s.push_back(());
        }
        assert_eq!(s.len(), 1000);
        assert_eq!(s.capacity(), usize::MAX);
        assert_eq!(s.max_size(), usize::MAX);
        s.pop_back();
        assert_eq!(s.len(), 999);
    }

    #[test]
    fn max_size_bounds_capacity() {
        let mut s: DynamicSequence<u32> = DynamicSequence::new();
        s.extend(0..10);
        assert!(s.max_size() >= s.capacity());
        assert_eq!(s.max_size(), isize::MAX as usize / 4);
    }

    #[test]
    fn display_clone_and_from_vec() {
        let s: DynamicSequence<i32> = vec![1, 2, 3].into();
        assert_eq!(format!("{}", s), "[1, 2, 3]");
        assert_eq!(format!("{}", DynamicSequence::<i32>::new()), "[]");

        let mut c = s.clone();
        assert_eq!(c, s);
        c.push_back(4);
        assert_ne!(c, s);
        assert_eq!((&c).into_iter().sum::<i32>(), 10);
    }

    #[test]
    fn config_defaults_when_unset() -> Result<(), Error> {
        let config = SuiteConfig::from_lookup(|_| None)?;
        assert_eq!(config, SuiteConfig::default());
        assert_eq!(config.log_level, Level::INFO);
        Ok(())
    }

    #[test]
    fn config_reads_every_variable() -> Result<(), Error> {
        let vars: HashMap<&str, &str> = vec![
            ("DYNSEQ_SEED", "1234"),
            ("DYNSEQ_NEGATIVE", "true"),
            ("DYNSEQ_LOG", "debug"),
        ].into_iter().collect();
        let config = SuiteConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))?;
        assert_eq!(config.seed, Some(1234));
        assert!(config.include_negative);
        assert_eq!(config.log_level, Level::DEBUG);
        Ok(())
    }

    #[test]
    fn config_rejects_bad_values() {
        let bad_seed = SuiteConfig::from_lookup(|name| if name == "DYNSEQ_SEED" { Some("soon".into()) } else { None });
        assert!(matches!(bad_seed, Err(Error::Config(_))));

        let bad_flag = SuiteConfig::from_lookup(|name| if name == "DYNSEQ_NEGATIVE" { Some("maybe".into()) } else { None });
        assert!(matches!(bad_flag, Err(Error::Config(_))));
    }

    #[test]
    fn fixture_lifecycle() {
        let mut env = Environment::with_seed(7);
        let mut fixture = CollectionFixture::new();
        assert!(!fixture.is_set_up());

        fixture.set_up();
        assert!(fixture.collection().is_empty());

        fixture.add_entries(env.rng(), 50);
        assert_eq!(fixture.collection().len(), 50);
        assert!(fixture.collection().iter().all(|v| (0..=99).contains(v)));

        fixture.tear_down();
        assert!(!fixture.is_set_up());
    }

    #[test]
    #[should_panic(expected = "positive count")]
    fn add_entries_rejects_zero() {
        let mut env = Environment::with_seed(7);
        let mut fixture = CollectionFixture::new();
        fixture.set_up();
        fixture.add_entries(env.rng(), 0);
    }

    #[test]
    fn same_seed_same_entries() {
        let entries = |seed| {
            let mut env = Environment::with_seed(seed);
            let mut fixture = CollectionFixture::new();
            fixture.set_up();
            fixture.add_entries(env.rng(), 20);
            fixture.collection().as_slice().to_vec()
        };
        assert_eq!(entries(99), entries(99));
        assert_eq!(Environment::with_seed(99).seed(), 99);
    }

    #[test]
    fn collection_cases_all_pass() {
        let suite = cases::suite_for(&SuiteConfig::default());
        assert_eq!(suite.len(), cases::collection_cases().len());

        let report = suite.run(&mut Environment::with_seed(42));
        for case in report.cases() {
            assert!(case.passed(), "{} failed: {:?}", case.name, case.failures);
        }
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn negative_cases_fail_with_their_severity() {
        let config = SuiteConfig { include_negative: true, ..SuiteConfig::default() };
        let report = cases::suite_for(&config).run(&mut Environment::from_time());

        assert_eq!(report.failed(), 2);
        assert_eq!(report.exit_code(), 1);

        let always = report.case("always_fail").unwrap();
        assert!(always.aborted);
        assert_eq!(always.failures, vec!["always fails".to_string()]);

        let custom = report.case("custom_failed_test").unwrap();
        assert!(!custom.aborted);
        assert_eq!(custom.failures.len(), 1);
    }

    fn leaves_entries(ctx: &mut CaseContext<'_>) -> CaseResult {
        ctx.add_entries(3);
        ctx.expect(false, "first soft failure");
        ctx.expect(false, "second soft failure");
        assert_eq!(ctx.failures().len(), 2);
        Ok(())
    }

    fn pops_too_far(ctx: &mut CaseContext<'_>) -> CaseResult {
        ctx.collection_mut().pop_back();
        Ok(())
    }

    fn sees_fresh_collection(ctx: &mut CaseContext<'_>) -> CaseResult {
        let len = ctx.collection().len();
        ctx.require(len == 0, "state leaked from an earlier case")
    }

    #[test]
    fn cases_are_isolated() {
        let mut suite = Suite::new();
        suite
            .add(TestCase { name: "leaves_entries", body: leaves_entries })
            .add(TestCase { name: "pops_too_far", body: pops_too_far })
            .add(TestCase { name: "sees_fresh_collection", body: sees_fresh_collection });

        let report = suite.run(&mut Environment::with_seed(1));

        let soft = report.case("leaves_entries").unwrap();
        assert_eq!(soft.failures.len(), 2);
        assert!(!soft.aborted);

        let panicked = report.case("pops_too_far").unwrap();
        assert!(panicked.panicked);
        assert!(panicked.failures[0].contains("pop_back on empty sequence"));

        assert!(report.case("sees_fresh_collection").unwrap().passed());
        assert_eq!(report.passed(), 1);
    }

    mod properties {
        use {
            crate::sequence::DynamicSequence,
            proptest::prelude::*,
        };

        proptest! {
            #[test]
            fn capacity_covers_len(values in prop::collection::vec(any::<i32>(), 0..200), cut in 0usize..250) {
                let mut s = DynamicSequence::new();
                for &v in &values {
                    s.push_back(v);
                    prop_assert!(s.capacity() >= s.len());
                }
                prop_assert_eq!(s.len(), values.len());

                s.resize(cut);
                prop_assert_eq!(s.len(), cut);
                prop_assert!(s.capacity() >= s.len());
            }

            #[test]
            fn resize_moves_size_in_the_right_direction(start in 0usize..100, target in 0usize..100) {
                let mut s: DynamicSequence<u8> = DynamicSequence::new();
                s.resize(start);
                s.resize(target);
                prop_assert_eq!(s.len(), target);
                prop_assert!(s.as_slice().iter().all(|&v| v == 0));
            }

            #[test]
            fn reserve_past_capacity(len in 0usize..64, extra in 1usize..64) {
                let mut s = DynamicSequence::new();
                s.extend(0..len);
                let target = s.capacity() + extra;
                s.reserve(target);
                prop_assert!(s.capacity() >= target);
                prop_assert_eq!(s.len(), len);
            }

            #[test]
            fn erase_matches_vec_drain(values in prop::collection::vec(any::<i16>(), 0..64), a in 0usize..64, b in 0usize..64) {
                let (start, end) = (a.min(b).min(values.len()), a.max(b).min(values.len()));
                let mut s: DynamicSequence<i16> = values.clone().into();
                let mut expected = values;
                expected.drain(start..end);
                s.erase(start..end);
                prop_assert_eq!(s.as_slice(), expected.as_slice());
            }

            #[test]
            fn pop_back_drops_exactly_one(values in prop::collection::vec(any::<u32>(), 1..64)) {
                let mut s: DynamicSequence<u32> = values.clone().into();
                let popped = s.pop_back();
                prop_assert_eq!(Some(&popped), values.last());
                prop_assert_eq!(s.len(), values.len() - 1);
            }

            #[test]
            fn at_past_len_is_out_of_range(len in 0usize..32, past in 0usize..32) {
                let mut s = DynamicSequence::with_capacity(64);
                s.extend(0..len);
                prop_assert!(s.at(len + past).is_err());
            }
        }
    }
}
