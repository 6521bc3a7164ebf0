use std::fmt;

/// SentinelRule is implemented by every concrete rule kind (flow, and in
/// the future degrade/authority/system) so that block errors can carry
/// an opaque reference back to the rule that triggered them.
pub trait SentinelRule: fmt::Debug + Send + Sync {
    fn resource_name(&self) -> String;
    fn is_valid(&self) -> crate::Result<()>;
}
