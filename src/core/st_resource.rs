use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

/// A single-threaded, reference-counted resource with interior mutability.
///
/// `StResource` lets several handles on the same frame-loop thread share one value of
/// type `T`. It wraps an `Rc<RefCell<T>>`, so cloning the resource is cheap and every
/// clone observes the same underlying data.
///
/// The world facade keeps all of its mutable state in one `StResource`, which is what
/// allows a collision drain future to be suspended while the same caller keeps adding
/// and removing blocks through another handle.
///
/// # Type Parameters
/// - `T`: The type of the contained resource
///
/// # Examples
///
/// ```
/// use voxel_chunk_core::core::StResource;
///
/// let counter = StResource::new(0);
/// let clone = counter.clone();
///
/// *clone.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Panics
/// - Panics if a mutable borrow is requested while any other borrow is alive
/// - Panics if a shared borrow is requested while a mutable borrow is alive
///
/// Guards must therefore never be held across an `.await` point.
pub struct StResource<T> {
    resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
    ///
    /// # Arguments
    /// * `resource` - The value to be stored in the resource
    ///
    /// # Returns
    /// A new `StResource` containing the provided value
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RefCell::new(resource)),
        }
    }

    /// Returns a guard that allows reading the contained value.
    pub fn get(&self) -> Ref<'_, T> {
        self.resource.borrow()
    }

    /// Returns a guard that allows modifying the contained value.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.resource.borrow_mut()
    }

    /// Returns `true` if both handles point at the same underlying value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<T: Default> Default for StResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for StResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StResource").field(&self.resource).finish()
    }
}
