//! Method tier classification and whitelist.
//!
//! Tier 1: Public (No Auth) - What the public site reads
//! Tier 2: Staff (Bearer token) - Everything the dashboard changes

use std::collections::HashMap;
use std::sync::LazyLock;

/// Method access tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodTier {
    /// Public - no session required
    Public,
    /// Staff - requires a valid staff session
    Staff,
}

impl MethodTier {
    /// Check if tier requires authentication
    pub fn requires_auth(&self) -> bool {
        matches!(self, MethodTier::Staff)
    }
}

/// Method namespace, the part of the name before the dot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodCategory {
    Faq,
    Team,
    Product,
    News,
    Media,
}

impl MethodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodCategory::Faq => "faq",
            MethodCategory::Team => "team",
            MethodCategory::Product => "product",
            MethodCategory::News => "news",
            MethodCategory::Media => "media",
        }
    }
}

/// Method metadata
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// Full method name (e.g., "faq.reorder")
    pub name: &'static str,
    /// Access tier
    pub tier: MethodTier,
    /// Category
    pub category: MethodCategory,
    /// Does the method change stored content?
    pub is_write: bool,
    /// Brief description
    pub description: &'static str,
}

impl MethodInfo {
    /// Create a public read method.
    const fn public(
        name: &'static str,
        category: MethodCategory,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            tier: MethodTier::Public,
            category,
            is_write: false,
            description,
        }
    }

    /// Create a staff-only read method.
    const fn staff_read(
        name: &'static str,
        category: MethodCategory,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            tier: MethodTier::Staff,
            category,
            is_write: false,
            description,
        }
    }

    /// Create a staff-only write method.
    const fn staff_write(
        name: &'static str,
        category: MethodCategory,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            tier: MethodTier::Staff,
            category,
            is_write: true,
            description,
        }
    }

    /// Operation name without the namespace.
    pub fn operation(&self) -> &'static str {
        self.name
            .split_once('.')
            .map(|(_, op)| op)
            .unwrap_or(self.name)
    }
}

use MethodCategory::*;

/// Every method the gateway serves.
static METHODS: &[MethodInfo] = &[
    // FAQ
    MethodInfo::public("faq.list", Faq, "FAQs in display order"),
    MethodInfo::public("faq.get", Faq, "One FAQ"),
    MethodInfo::staff_write("faq.create", Faq, "Append a FAQ"),
    MethodInfo::staff_write("faq.update", Faq, "Replace a FAQ's text"),
    MethodInfo::staff_write("faq.delete", Faq, "Delete a FAQ and close the gap"),
    MethodInfo::staff_write("faq.reorder", Faq, "Apply a full FAQ permutation"),
    // Team
    MethodInfo::public("team.list", Team, "Team members in display order"),
    MethodInfo::public("team.get", Team, "One team member"),
    MethodInfo::staff_write("team.create", Team, "Append a team member"),
    MethodInfo::staff_write("team.update", Team, "Replace a team member"),
    MethodInfo::staff_write("team.delete", Team, "Delete a team member and their photo"),
    MethodInfo::staff_write("team.reorder", Team, "Apply a full team permutation"),
    // Products
    MethodInfo::public("product.list", Product, "Visible products in display order"),
    MethodInfo::public("product.get", Product, "One visible product"),
    MethodInfo::staff_read("product.listAll", Product, "Every product, hidden included"),
    MethodInfo::staff_write("product.create", Product, "Append a product"),
    MethodInfo::staff_write("product.update", Product, "Replace a product"),
    MethodInfo::staff_write("product.delete", Product, "Delete a product and its images"),
    MethodInfo::staff_write("product.reorder", Product, "Apply a full product permutation"),
    MethodInfo::staff_write("product.setVisibility", Product, "Hide or show a product"),
    // News
    MethodInfo::public("news.list", News, "Published articles, newest first"),
    MethodInfo::public("news.getBySlug", News, "One published article"),
    MethodInfo::staff_read("news.listAll", News, "Every article, optionally by status"),
    MethodInfo::staff_read("news.get", News, "One article in any state"),
    MethodInfo::staff_write("news.create", News, "Create a draft"),
    MethodInfo::staff_write("news.update", News, "Replace an article's content"),
    MethodInfo::staff_write("news.setStatus", News, "Publish, unpublish or revert to draft"),
    MethodInfo::staff_write("news.delete", News, "Delete an article and its cover"),
    MethodInfo::staff_read("news.listTags", News, "Every tag"),
    // Media
    MethodInfo::staff_write("media.requestUpload", Media, "Presign a direct upload"),
];

static METHOD_REGISTRY: LazyLock<HashMap<&'static str, &'static MethodInfo>> =
    LazyLock::new(|| METHODS.iter().map(|m| (m.name, m)).collect());

/// Get method info by name
pub fn get_method_info(method: &str) -> Option<&'static MethodInfo> {
    METHOD_REGISTRY.get(method).copied()
}

/// Get method tier
pub fn get_method_tier(method: &str) -> Option<MethodTier> {
    get_method_info(method).map(|m| m.tier)
}

/// Check if method is supported
pub fn is_method_supported(method: &str) -> bool {
    METHOD_REGISTRY.contains_key(method)
}

/// All supported method names
pub fn all_methods() -> impl Iterator<Item = &'static str> {
    METHODS.iter().map(|m| m.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_methods() {
        for name in [
            "faq.list",
            "faq.get",
            "team.list",
            "product.get",
            "news.list",
            "news.getBySlug",
        ] {
            assert_eq!(get_method_tier(name), Some(MethodTier::Public), "{name}");
        }
    }

    #[test]
    fn test_every_write_is_staff() {
        for info in METHODS {
            if info.is_write {
                assert_eq!(info.tier, MethodTier::Staff, "{}", info.name);
            }
        }
        assert_eq!(get_method_tier("product.listAll"), Some(MethodTier::Staff));
        assert_eq!(get_method_tier("news.get"), Some(MethodTier::Staff));
    }

    #[test]
    fn test_unknown_method() {
        assert!(!is_method_supported("faq.explode"));
        assert!(get_method_info("eth_getBalance").is_none());
    }

    #[test]
    fn test_names_are_unique_and_namespaced() {
        assert_eq!(METHOD_REGISTRY.len(), METHODS.len());
        for info in METHODS {
            let (namespace, _) = info.name.split_once('.').unwrap();
            assert_eq!(namespace, info.category.as_str());
        }
        assert_eq!(
            get_method_info("product.setVisibility").unwrap().operation(),
            "setVisibility"
        );
        assert_eq!(all_methods().count(), 30);
    }
}
