//! Collection scenarios run against a fresh `DynamicSequence<i32>` each.
//!
//! `always_fail` and `custom_failed_test` fail on purpose to show how the
//! suite reports hard and soft failures; they only run when asked for.

use crate::{
    config::SuiteConfig,
    harness::{CaseContext, CaseResult, Suite, TestCase},
};

/// The suite the binary runs for `config`
pub fn suite_for(config: &SuiteConfig) -> Suite {
    let mut suite = Suite::new();
    suite.extend(collection_cases());
    if config.include_negative {
        suite.extend(negative_cases());
    }
    suite
}

pub fn collection_cases() -> Vec<TestCase> {
    vec![
        TestCase { name: "collection_is_set_up", body: collection_is_set_up },
        TestCase { name: "is_empty_on_create", body: is_empty_on_create },
        TestCase { name: "can_add_to_empty_sequence", body: can_add_to_empty_sequence },
        TestCase { name: "can_add_five_values", body: can_add_five_values },
        TestCase { name: "max_size_at_least_size", body: max_size_at_least_size },
        TestCase { name: "capacity_at_least_size", body: capacity_at_least_size },
        TestCase { name: "resizing_increases_size", body: resizing_increases_size },
        TestCase { name: "resizing_decreases_size", body: resizing_decreases_size },
        TestCase { name: "resizing_to_zero", body: resizing_to_zero },
        TestCase { name: "clear_erases_collection", body: clear_erases_collection },
        TestCase { name: "erase_whole_range", body: erase_whole_range },
        TestCase { name: "reserve_increases_capacity_not_size", body: reserve_increases_capacity_not_size },
        TestCase { name: "at_out_of_bounds_errors", body: at_out_of_bounds_errors },
        TestCase { name: "pop_back_removes_one_entry", body: pop_back_removes_one_entry },
    ]
}

pub fn negative_cases() -> Vec<TestCase> {
    vec![
        TestCase { name: "always_fail", body: always_fail },
        TestCase { name: "custom_failed_test", body: custom_failed_test },
    ]
}

fn collection_is_set_up(ctx: &mut CaseContext<'_>) -> CaseResult {
    let set_up = ctx.fixture().is_set_up();
    ctx.require(set_up, "fixture holds no collection")
}

fn is_empty_on_create(ctx: &mut CaseContext<'_>) -> CaseResult {
    let empty = ctx.collection().is_empty();
    ctx.require(empty, "new collection is not empty")?;
    let len = ctx.collection().len();
    ctx.require(len == 0, "new collection has a non-zero size")
}

fn can_add_to_empty_sequence(ctx: &mut CaseContext<'_>) -> CaseResult {
    let empty = ctx.collection().is_empty();
    ctx.require(empty, "collection is not empty before adding")?;

    ctx.add_entries(1);

    let empty = ctx.collection().is_empty();
    ctx.expect(!empty, "collection still empty after adding one entry");
    let len = ctx.collection().len();
    ctx.require(len == 1, "size is not 1 after adding one entry")
}

fn can_add_five_values(ctx: &mut CaseContext<'_>) -> CaseResult {
    let empty = ctx.collection().is_empty();
    ctx.require(empty, "collection is not empty before adding")?;

    ctx.add_entries(5);

    let empty = ctx.collection().is_empty();
    ctx.expect(!empty, "collection still empty after adding five entries");
    let len = ctx.collection().len();
    ctx.require(len == 5, "size is not 5 after adding five entries")
}

fn max_size_at_least_size(ctx: &mut CaseContext<'_>) -> CaseResult {
    let max_size = ctx.collection().max_size();
    for &n in &[0usize, 1, 5, 10] {
        ctx.require(max_size >= n, &format!("max_size {} below {}", max_size, n))?;
    }
    Ok(())
}

fn capacity_at_least_size(ctx: &mut CaseContext<'_>) -> CaseResult {
    // entries to add before each check, giving 0, 1, 5 and 10 in total
    for &(add, total) in &[(0usize, 0usize), (1, 1), (4, 5), (5, 10)] {
        if add > 0 {
            ctx.add_entries(add);
        }
        let capacity = ctx.collection().capacity();
        ctx.require(capacity >= total, &format!("capacity {} below {} entries", capacity, total))?;
    }
    Ok(())
}

fn resizing_increases_size(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(1);
    let initial = ctx.collection().len();

    ctx.collection_mut().resize(2);

    let len = ctx.collection().len();
    ctx.require(len > initial, "resize(2) did not grow the collection")
}

fn resizing_decreases_size(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(10);
    let initial = ctx.collection().len();

    ctx.collection_mut().resize(1);

    let len = ctx.collection().len();
    ctx.require(len < initial, "resize(1) did not shrink the collection")
}

fn resizing_to_zero(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(1);
    ctx.collection_mut().resize(0);

    let len = ctx.collection().len();
    ctx.require(len == 0, "resize(0) left entries behind")
}

fn clear_erases_collection(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(3);
    ctx.collection_mut().clear();

    let len = ctx.collection().len();
    ctx.require(len == 0, "clear left entries behind")
}

fn erase_whole_range(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(15);
    let len = ctx.collection().len();
    ctx.collection_mut().erase(0..len);

    let len = ctx.collection().len();
    ctx.require(len == 0, "erasing begin..end left entries behind")
}

fn reserve_increases_capacity_not_size(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(10);
    let initial_capacity = ctx.collection().capacity();
    let initial_len = ctx.collection().len();

    ctx.collection_mut().reserve(15);

    let len = ctx.collection().len();
    ctx.expect(len == initial_len, "reserve changed the size");
    let capacity = ctx.collection().capacity();
    ctx.expect(capacity > initial_capacity, "reserve(15) did not grow the capacity");
    ctx.expect(capacity >= 15, "capacity below 15 after reserve(15)");
    Ok(())
}

fn at_out_of_bounds_errors(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(10);
    let result = ctx.collection().at(11).map(|v| *v);
    ctx.require_err(&result, "at(11) on 10 entries did not fail")
}

fn pop_back_removes_one_entry(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(5);
    let initial = ctx.collection().len();

    ctx.collection_mut().pop_back();

    let len = ctx.collection().len();
    ctx.require(initial - len == 1, "pop_back did not remove exactly one entry")
}

fn always_fail(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.fail("always fails")
}

fn custom_failed_test(ctx: &mut CaseContext<'_>) -> CaseResult {
    ctx.add_entries(5);
    let len = ctx.collection().len();
    ctx.expect(len == 5, "size is not 5 after adding five entries");

    let initial = ctx.collection().len();
    ctx.expect(initial == 5, "initial size is not 5");

    ctx.add_entries(1);

    // fails: the size went up by one
    let len = ctx.collection().len();
    ctx.expect(len == initial, "size changed after adding one entry");
    Ok(())
}
