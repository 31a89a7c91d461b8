// Property-based tests for page bounds

use common::errors::ValidationError;
use common::pagination::{page_count, PageRequest};
use proptest::prelude::*;

// Page bounds follow `0 <= page - 1 <= ceil(total / size)`.
#[test]
fn property_page_bounds() {
    proptest!(|(
        page in -5i64..200,
        size in 1i64..50,
        total in 0i64..2000,
    )| {
        let result = PageRequest::new(page, size).validate(total);
        let pages = (total as f64 / size as f64).ceil() as i64;

        if page < 1 {
            prop_assert_eq!(result, Err(ValidationError::PageBelowRange));
        } else if page - 1 > pages {
            prop_assert_eq!(result, Err(ValidationError::PageAboveRange(page)));
        } else {
            prop_assert!(result.is_ok());
        }
    });
}

// Valid pages never start beyond the stored records.
#[test]
fn property_offset_within_bounds() {
    proptest!(|(
        size in 1i64..50,
        total in 0i64..2000,
    )| {
        let last = page_count(total, size) + 1;
        let request = PageRequest::new(last, size);
        prop_assert!(request.validate(total).is_ok());
        prop_assert!(request.offset() <= total + size);
        prop_assert_eq!(request.limit(), size);
    });
}

// Non-positive sizes are always rejected.
#[test]
fn property_invalid_size() {
    proptest!(|(
        page in 1i64..10,
        size in -10i64..1,
        total in 0i64..100,
    )| {
        prop_assert_eq!(
            PageRequest::new(page, size).validate(total),
            Err(ValidationError::InvalidPageSize)
        );
    });
}

// Extreme query values are rejected or accepted without overflowing.
#[test]
fn property_extreme_values() {
    proptest!(|(
        page in any::<i64>(),
        size in 1i64..=i64::MAX,
        total in 0i64..2000,
    )| {
        let result = PageRequest::new(page, size).validate(total);
        let pages = total / size + i64::from(total % size != 0);

        if page < 1 {
            prop_assert_eq!(result, Err(ValidationError::PageBelowRange));
        } else if page - 1 > pages {
            prop_assert_eq!(result, Err(ValidationError::PageAboveRange(page)));
        } else {
            prop_assert!(result.is_ok());
        }
    });
}

#[test]
fn test_boundary_requests() {
    assert!(PageRequest::new(1, i64::MAX).validate(5).is_ok());
    assert_eq!(page_count(5, i64::MAX), 1);
    assert_eq!(page_count(i64::MAX, 2), i64::MAX / 2 + 1);
    assert_eq!(
        PageRequest::new(i64::MIN, 10).validate(5),
        Err(ValidationError::PageBelowRange)
    );
    assert_eq!(PageRequest::new(i64::MIN, 10).offset(), 0);
}
