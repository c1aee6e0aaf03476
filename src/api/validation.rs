use super::ApiError;

/// Storefront cap on concurrently featured products
pub const MAX_FEATURED_PRODUCTS: usize = 8;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_quantity(quantity: i32) -> Result<i32, ApiError> {
    if quantity <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid quantity: {}. Quantity must be a positive integer",
            quantity
        )));
    }
    Ok(quantity)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(ApiError::validation("A valid email address is required"));
    }
    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }
    Ok(password)
}

pub fn validate_required(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_featured_ids(ids: &[i32]) -> Result<(), ApiError> {
    if ids.len() > MAX_FEATURED_PRODUCTS {
        return Err(ApiError::validation(format!(
            "At most {} products can be featured at once",
            MAX_FEATURED_PRODUCTS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id(1).is_ok());
        assert!(validate_id(12345).is_ok());
        assert!(validate_id(0).is_err());
        assert!(validate_id(-1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("shopper@example.com").is_ok());
        assert_eq!(validate_email("  padded@example.com  ").unwrap(), "padded@example.com");
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_validate_featured_ids() {
        assert!(validate_featured_ids(&[]).is_ok());
        assert!(validate_featured_ids(&[1, 2, 3, 4, 5, 6, 7, 8]).is_ok());
        assert!(validate_featured_ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9]).is_err());
    }
}
