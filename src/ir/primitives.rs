use crate::ir::ClassId;
use rustc_hash::FxHashMap;

/// How a source-language value type maps onto the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveInfo {
    /// Platform primitive spelling (`int`, `void`); `None` when there is no
    /// primitive form at all.
    pub primitive_name: Option<String>,
    /// Whether the primitive form is also used outside return position.
    pub other_is_primitive: bool,
    /// The boxed platform class used whenever the primitive form is not.
    pub boxed_class: ClassId,
    pub source_package: String,
    pub source_name: String,
}

#[derive(Debug, Default)]
pub struct PrimitiveTypeMapping {
    by_class: FxHashMap<ClassId, PrimitiveInfo>,
}

impl PrimitiveTypeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: ClassId, info: PrimitiveInfo) {
        self.by_class.insert(class, info);
    }

    pub fn info(&self, class: ClassId) -> Option<&PrimitiveInfo> {
        self.by_class.get(&class)
    }
}
