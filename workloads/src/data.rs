use anyhow::{Context, anyhow};
use arena_core::{BenchRegistry, HostValue, RegistryError, Suite, rng::Lcg};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const JSON_ITEMS: usize = 100;
pub const JSON_VALUES_PER_ITEM: usize = 10;
pub const JSON_DECODE_ROUNDS: usize = 100;
pub const QUICK_SORT_LEN: usize = 10_000;
pub const BUBBLE_SORT_LEN: usize = 1_000;
pub const BUBBLE_SORT_SEED: u32 = 999;

/// JSON decoding and in-memory sorting.
#[derive(Debug, Default)]
pub struct DataSuite;

impl DataSuite {
    pub fn new() -> Self {
        Self
    }
}

impl Suite for DataSuite {
    fn name(&self) -> &str {
        "data"
    }

    fn description(&self) -> &str {
        "document decoding and comparison sorts"
    }

    fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
        registry.register("jsonParse.dynamic", || {
            let encoded = encode_catalog(&sample_catalog(JSON_ITEMS))?;
            let mut decoded = 0;
            for _ in 0..JSON_DECODE_ROUNDS {
                decoded = decode_dynamic(&encoded)?;
            }
            Ok(HostValue::from(decoded))
        })?;
        registry.register("jsonParse.typed", || {
            let encoded = encode_catalog(&sample_catalog(JSON_ITEMS))?;
            let mut decoded = 0;
            for _ in 0..JSON_DECODE_ROUNDS {
                decoded = decode_typed(&encoded)?;
            }
            Ok(HostValue::from(decoded))
        })?;
        registry.register_alias("jsonParse", "jsonParse.typed")?;

        registry.register("quickSort.lomuto", || {
            let mut values = quick_sort_input(QUICK_SORT_LEN);
            quick_sort(&mut values);
            Ok(HostValue::Nil)
        })?;
        registry.register("quickSort.std", || {
            let mut values = quick_sort_input(QUICK_SORT_LEN);
            values.sort_unstable();
            Ok(HostValue::Nil)
        })?;
        registry.register_alias("quickSort", "quickSort.std")?;

        registry.register("bubbleSort.classic", || {
            let mut values = bubble_sort_input(BUBBLE_SORT_LEN, BUBBLE_SORT_SEED);
            bubble_sort_classic(&mut values);
            Ok(HostValue::Nil)
        })?;
        registry.register("bubbleSort.early_exit", || {
            let mut values = bubble_sort_input(BUBBLE_SORT_LEN, BUBBLE_SORT_SEED);
            bubble_sort(&mut values);
            Ok(HostValue::Nil)
        })?;
        registry.register_alias("bubbleSort", "bubbleSort.early_exit")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<Item>,
}

pub fn sample_catalog(items: usize) -> Catalog {
    let items = (0..items as i64)
        .map(|id| Item {
            id,
            name: format!("item-{id}"),
            values: (0..JSON_VALUES_PER_ITEM as i64)
                .map(|j| id * JSON_VALUES_PER_ITEM as i64 + j)
                .collect(),
        })
        .collect();
    Catalog { items }
}

pub fn encode_catalog(catalog: &Catalog) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec(catalog).context("failed to encode catalog")
}

/// Decode into derived structs; returns the number of items.
pub fn decode_typed(encoded: &[u8]) -> anyhow::Result<usize> {
    let catalog: Catalog = serde_json::from_slice(encoded).context("failed to decode catalog")?;
    Ok(catalog.items.len())
}

/// Decode into an untyped value tree and walk every nested list.
pub fn decode_dynamic(encoded: &[u8]) -> anyhow::Result<usize> {
    let doc: serde_json::Value =
        serde_json::from_slice(encoded).context("failed to decode catalog")?;
    let items = doc
        .get("items")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| anyhow!("catalog has no `items` array"))?;
    for item in items {
        if item.get("values").and_then(serde_json::Value::as_array).is_none() {
            return Err(anyhow!("catalog item has no `values` array"));
        }
    }
    Ok(items.len())
}

/// `i ^ 0x3F` for `i` in `0..len`.
pub fn quick_sort_input(len: usize) -> Vec<i32> {
    (0..len as i32).map(|i| i ^ 0x3F).collect()
}

pub fn bubble_sort_input(len: usize, seed: u32) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    let mut values = vec![0.0; len];
    rng.fill_f64(&mut values);
    values
}

/// In-place quicksort with a Lomuto partition and median-of-three pivot.
///
/// Recurses into the smaller side and loops over the larger, so stack depth
/// stays logarithmic.
pub fn quick_sort<T: PartialOrd + Copy>(values: &mut [T]) {
    let mut slice = values;
    while slice.len() > 1 {
        let pivot = lomuto_partition(slice);
        let (left, right) = std::mem::take(&mut slice).split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quick_sort(left);
            slice = right;
        } else {
            quick_sort(right);
            slice = left;
        }
    }
}

fn lomuto_partition<T: PartialOrd + Copy>(values: &mut [T]) -> usize {
    let high = values.len() - 1;
    let mid = high / 2;
    if values[mid] < values[0] {
        values.swap(mid, 0);
    }
    if values[high] < values[0] {
        values.swap(high, 0);
    }
    if values[mid] < values[high] {
        values.swap(mid, high);
    }
    let pivot = values[high];
    let mut store = 0;
    for j in 0..high {
        if values[j] <= pivot {
            values.swap(store, j);
            store += 1;
        }
    }
    values.swap(store, high);
    store
}

/// Every pass runs to the end, even when the slice is already sorted.
pub fn bubble_sort_classic<T: PartialOrd>(values: &mut [T]) {
    let n = values.len();
    for i in 0..n.saturating_sub(1) {
        for j in 0..n - i - 1 {
            if values[j].partial_cmp(&values[j + 1]) == Some(Ordering::Greater) {
                values.swap(j, j + 1);
            }
        }
    }
}

/// Stops after the first pass that performs no swap.
pub fn bubble_sort<T: PartialOrd>(values: &mut [T]) {
    let mut n = values.len();
    while n > 1 {
        let mut last_swap = 0;
        for j in 0..n - 1 {
            if values[j].partial_cmp(&values[j + 1]) == Some(Ordering::Greater) {
                values.swap(j, j + 1);
                last_swap = j + 1;
            }
        }
        if last_swap == 0 {
            break;
        }
        n = last_swap;
    }
}
