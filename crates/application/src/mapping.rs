//! Entity to DTO mapping.
//!
//! Each supported pair is an explicit [`MapFrom`] implementation, so asking
//! for an unsupported conversion fails to compile. [`MappingRegistry`] lists
//! the pairs the application registers, and registering a pair that has no
//! implementation is a compile error as well.

use accredigo_domain::{Accreditation, ExploreUserAccess, Facility, FacilityUser, SubscriptionPlan, User};

use crate::dto::{
    AccreditationDto, ExploreUserDto, FacilityDto, FacilityUserDto, SubscriptionPlanDto, UserDto,
};

/// Build `Self` from a borrowed source.
pub trait MapFrom<S>: Sized {
    fn map_from(source: S) -> Self;
}

/// Call-site sugar for [`MapFrom`].
pub trait MapInto<T> {
    fn map_into(self) -> T;
}

impl<S, T: MapFrom<S>> MapInto<T> for S {
    fn map_into(self) -> T {
        T::map_from(self)
    }
}

/// One registered source/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingPair {
    pub source: &'static str,
    pub target: &'static str,
}

/// Names every mapping the application registers.
pub struct MappingRegistry;

fn assert_mapping<S, T>()
where
    T: for<'a> MapFrom<&'a S>,
{
}

macro_rules! register_mappings {
    ($($source:ty => $target:ty),+ $(,)?) => {
        const REGISTERED: &[MappingPair] = &[
            $(MappingPair { source: stringify!($source), target: stringify!($target) }),+
        ];

        #[allow(dead_code)]
        fn registered_mappings_compile() {
            $(assert_mapping::<$source, $target>();)+
        }
    };
}

register_mappings! {
    User => UserDto,
    Accreditation => AccreditationDto,
    SubscriptionPlan => SubscriptionPlanDto,
    Facility => FacilityDto,
    (User, ExploreUserAccess) => ExploreUserDto,
    (User, FacilityUser) => FacilityUserDto,
}

impl MappingRegistry {
    /// Every registered pair, in registration order.
    pub fn registered() -> &'static [MappingPair] {
        REGISTERED
    }

    pub fn is_registered(source: &str, target: &str) -> bool {
        REGISTERED
            .iter()
            .any(|pair| pair.source == source && pair.target == target)
    }
}
