fn total(values: &[i64]) -> i64 {
    let mut sum = 0;
    for v in values {
        sum += v;
    }
    sum
}
