/// Fills in the [`Layer`](crate::layers::base::Layer) methods that just read
/// or write a `LayerProperties` field, plus the `Any` downcasts.
///
/// ```ignore
/// impl Layer for TrailLayer {
///     caminos::impl_layer_trait!(properties);
///
///     fn options(&self) -> serde_json::Value {
///         serde_json::Value::Null
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($props:ident) => {
        fn id(&self) -> &str {
            &self.$props.id
        }

        fn name(&self) -> &str {
            &self.$props.name
        }

        fn layer_type(&self) -> $crate::layers::base::LayerType {
            self.$props.layer_type
        }

        fn role(&self) -> $crate::layers::base::LayerRole {
            self.$props.role
        }

        fn is_visible(&self) -> bool {
            self.$props.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$props.visible = visible;
        }

        fn z_index(&self) -> i32 {
            self.$props.z_index
        }

        fn set_z_index(&mut self, z_index: i32) {
            self.$props.z_index = z_index;
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}
